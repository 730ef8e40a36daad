//! أنواع الأخطاء الخاصة بالمكتبة

use std::time::Duration;
use thiserror::Error;

/// خطأ في إعدادات المحرك، يُكتشف قبل تشغيل أي عامل
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// عدد العمال يجب أن يكون أكبر من صفر
    #[error("عدد العمال غير صالح: {0} (يجب أن يكون أكبر من صفر)")]
    InvalidConcurrency(usize),

    /// حد المعدل يجب أن يكون أكبر من صفر
    #[error("حد المعدل غير صالح: {0} طلب/ثانية (يجب أن يكون أكبر من صفر)")]
    InvalidRateLimit(u32),

    /// النموذج لا يحتوي على حقل اسم مستخدم ولا حقل كلمة مرور
    #[error("النموذج {action} لا يحتوي على حقل اسم مستخدم أو كلمة مرور")]
    UntestableForm {
        /// عنوان إرسال النموذج
        action: String,
    },
}

/// فشل في إتمام طلب واحد
#[derive(Debug, Error)]
pub enum ProbeError {
    /// انتهت مهلة الطلب
    #[error("انتهت مهلة الطلب بعد {0:?}")]
    Timeout(Duration),

    /// عدد كبير من التحويلات
    #[error("عدد كبير جدًا من التحويلات: {url}")]
    TooManyRedirects {
        /// آخر عنوان قبل التوقف
        url: String,
    },

    /// فشل في قراءة جسم الاستجابة
    #[error("فشل في قراءة جسم الاستجابة: {0}")]
    Body(#[source] reqwest::Error),

    /// خطأ في النقل (DNS، رفض الاتصال، إعادة التعيين...)
    #[error("فشل في إرسال الطلب: {0}")]
    Transport(#[source] reqwest::Error),
}

impl ProbeError {
    /// تصنيف خطأ reqwest إلى أحد أنواع الفشل
    pub(crate) fn from_send(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_redirect() {
            Self::TooManyRedirects {
                url: err
                    .url()
                    .map_or_else(|| "غير معروف".to_string(), ToString::to_string),
            }
        } else {
            Self::Transport(err)
        }
    }
}

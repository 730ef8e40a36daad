//! نموذج تسجيل الدخول
//! وصف ثابت لنموذج مكتشف: عنوان الإرسال، الطريقة، أسماء الحقول والقيم الافتراضية

use std::collections::HashMap;
use std::fmt;
use url::Url;

/// طريقة إرسال النموذج
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
}

impl FormMethod {
    /// تحويل قيمة السمة `method` (بدون حساسية لحالة الأحرف)
    pub fn from_attr(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("post") {
            Self::Post
        } else {
            Self::Get
        }
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// نموذج تسجيل دخول مكتشف
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    /// ترتيب النموذج بين جميع نماذج الصفحة
    pub index: usize,

    /// عنوان الإرسال بعد حله نسبةً للصفحة
    pub action: Url,

    /// طريقة الإرسال
    pub method: FormMethod,

    /// اسم حقل المستخدم
    pub username_field: Option<String>,

    /// اسم حقل كلمة المرور
    pub password_field: Option<String>,

    /// أول قائمة منسدلة في النموذج
    pub select_field: Option<String>,

    /// خيارات القائمة المنسدلة
    pub select_options: Vec<String>,

    /// جميع الحقول مع قيمها الافتراضية (المخفية تُعاد كما هي)
    pub fields: HashMap<String, String>,
}

impl Form {
    /// إنشاء نموذج فارغ لعنوان معين
    pub fn new(action: Url, method: FormMethod) -> Self {
        Self {
            index: 0,
            action,
            method,
            username_field: None,
            password_field: None,
            select_field: None,
            select_options: Vec::new(),
            fields: HashMap::new(),
        }
    }

    /// تعيين حقل المستخدم
    #[must_use]
    pub fn with_username_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.fields.entry(name.clone()).or_default();
        self.username_field = Some(name);
        self
    }

    /// تعيين حقل كلمة المرور
    #[must_use]
    pub fn with_password_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.fields.entry(name.clone()).or_default();
        self.password_field = Some(name);
        self
    }

    /// إضافة حقل بقيمة افتراضية
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// بناء بيانات الإرسال لزوج واحد
    ///
    /// تبدأ من القيم الافتراضية (فتُعاد الحقول المخفية ورموز CSRF كما هي)
    /// ثم يُستبدل حقل المستخدم وحقل كلمة المرور إن وجدا.
    pub fn build_payload(&self, username: &str, password: &str) -> HashMap<String, String> {
        let mut payload = self.fields.clone();

        if let Some(field) = &self.username_field {
            payload.insert(field.clone(), username.to_string());
        }
        if let Some(field) = &self.password_field {
            payload.insert(field.clone(), password.to_string());
        }

        payload
    }

    /// وصف مختصر للعرض
    pub fn description(&self) -> String {
        let mut parts = vec![format!("Action: {}", self.action)];

        if let Some(field) = &self.username_field {
            parts.push(format!("Username: {field}"));
        }
        if let Some(field) = &self.password_field {
            parts.push(format!("Password: {field}"));
        }
        if let Some(field) = &self.select_field {
            parts.push(format!("Select: {field}"));
        }

        parts.join(", ")
    }

    /// نموذج تسجيل دخول كامل (مستخدم + كلمة مرور)
    pub fn is_login_form(&self) -> bool {
        self.username_field.is_some() && self.password_field.is_some()
    }

    /// هل يحتوي على حقل كلمة مرور؟
    pub fn has_password_field(&self) -> bool {
        self.password_field.is_some()
    }

    /// صالح للاختبار: يحتوي على أحد الحقلين على الأقل
    pub fn is_testable(&self) -> bool {
        self.username_field.is_some() || self.password_field.is_some()
    }
}

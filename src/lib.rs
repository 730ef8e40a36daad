//! مكتبة RedFox Form الأساسية
//! اختبار بيانات الاعتماد على نماذج تسجيل الدخول عبر الويب
//!
//! المسار الكامل: [`TargetScanner`] يجلب الصفحة ويكتشف النماذج، ثم
//! [`Bruteforcer`] يختبر الأزواج بعمال متوازيين حتى أول نجاح.

#![warn(missing_docs)]

pub mod bruteforcer;
pub mod classifier;
pub mod error;
pub mod form;
pub mod http_client;
pub mod limiter;
pub mod parser;
pub mod progress;
pub mod scanner;
pub mod utils;
pub mod validator;

// إعادة تصدير الأنواع الأساسية
pub use bruteforcer::{Bruteforcer, EngineConfig, FoundCredential, TestJob};
pub use classifier::{SuccessClassifier, Verdict};
pub use error::{ConfigError, ProbeError};
pub use form::{Form, FormMethod};
pub use http_client::{ClientSettings, HttpClient, Probe, ProbeResponse};
pub use progress::{AttemptOutcome, ProgressObserver, ProgressTracker};
pub use scanner::TargetScanner;
pub use validator::ValidationResult;

/// تهيئة المسجل
pub fn init(verbosity: u8) {
    utils::logger::init(verbosity);
}

/// معلومات الإصدار
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

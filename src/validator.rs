//! مدقق المدخلات
//! يفحص إعدادات الفحص قبل الاتصال بالهدف

use colored::Colorize;
use url::Url;

use crate::scanner::normalize_target;

/// نتيجة التحقق
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// لا أخطاء
    pub is_valid: bool,
    /// الأخطاء المانعة
    pub errors: Vec<String>,
    /// تحذيرات لا تمنع التشغيل
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// إنشاء نتيجة جديدة
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// إضافة خطأ
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(error.into());
    }

    /// إضافة تحذير
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// دمج نتيجة أخرى
    pub fn merge(&mut self, other: ValidationResult) {
        for error in other.errors {
            self.add_error(error);
        }
        self.warnings.extend(other.warnings);
    }

    /// التحقق مما إذا كان هناك أخطاء
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// عرض النتيجة
    pub fn display(&self) {
        if !self.errors.is_empty() {
            println!("{}", "أخطاء:".bright_red());
            for error in &self.errors {
                println!("  • {error}");
            }
        }

        if !self.warnings.is_empty() {
            println!("{}", "تحذيرات:".bright_yellow());
            for warning in &self.warnings {
                println!("  • {warning}");
            }
        }

        if self.is_valid {
            println!("{}", "التحقق ناجح!".bright_green());
        }
    }
}

/// التحقق من صحة رابط الهدف (العناوين المجردة تُكمل بـ http://)
pub fn validate_url(target: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if target.trim().is_empty() {
        result.add_error("الرابط فارغ");
        return result;
    }

    let normalized = normalize_target(target);
    if normalized != target.trim() {
        result.add_warning(format!("لا يوجد بروتوكول، سيُستخدم: {normalized}"));
    }

    match Url::parse(&normalized) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                result.add_error(format!("بروتوكول غير مدعوم: {}", parsed.scheme()));
            }
            match parsed.host_str() {
                None | Some("") => result.add_error("رابط غير صالح: لا يوجد نطاق"),
                Some("localhost" | "127.0.0.1" | "[::1]") => {
                    result.add_warning("الرابط يشير إلى مضيف محلي");
                }
                Some(_) => {}
            }
            if parsed.port() == Some(0) {
                result.add_error("رقم المنفذ غير صالح: 0");
            }
        }
        Err(e) => result.add_error(format!("رابط غير صالح: {e}")),
    }

    result
}

/// التحقق من صحة البروكسي
pub fn validate_proxy(proxy_url: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    match Url::parse(proxy_url) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                result.add_error(format!(
                    "صيغة البروكسي غير صالحة ({}). استخدم: http:// أو https://",
                    parsed.scheme()
                ));
            }
            if parsed.host_str().map_or(true, str::is_empty) {
                result.add_error("البروكسي بدون مضيف");
            }
            if parsed.port().is_none() {
                result.add_warning("البروكسي بدون منفذ، سيُستخدم المنفذ الافتراضي");
            }
        }
        Err(e) => result.add_error(format!("بروكسي غير صالح: {e}")),
    }

    result
}

/// التحقق من عدد العمال
pub fn validate_threads(threads: usize) -> ValidationResult {
    let mut result = ValidationResult::new();
    let max_threads = num_cpus::get() * 16;

    if threads == 0 {
        result.add_error("عدد العمال لا يمكن أن يكون صفرًا");
    } else if threads > max_threads {
        result.add_warning(format!(
            "عدد العمال كبير جدًا ({threads}). الحد المقترح: {}",
            num_cpus::get() * 4
        ));
    }

    result
}

/// التحقق من مهلة الطلب بالثواني
pub fn validate_timeout(timeout: u64) -> ValidationResult {
    let mut result = ValidationResult::new();

    if timeout == 0 {
        result.add_error("المهلة لا يمكن أن تكون صفرًا");
    } else if timeout > 300 {
        result.add_warning("مهلة طويلة جدًا (أقصى حد موصى به: 60 ثانية)");
    } else if timeout < 3 {
        result.add_warning("مهلة قصيرة جدًا قد تسبب فشل الطلبات");
    }

    result
}

/// التحقق من حد المعدل (طلبات/ثانية)
pub fn validate_rate_limit(rate: u32) -> ValidationResult {
    let mut result = ValidationResult::new();

    if rate == 0 {
        result.add_error("حد المعدل لا يمكن أن يكون صفرًا");
    } else if rate > 1000 {
        result.add_warning(format!("معدل مرتفع جدًا ({rate}/ثانية) قد يسبب حظر العنوان"));
    }

    result
}

/// التحقق الشامل من إعدادات الفحص
pub fn validate_target(url: &str, threads: usize, timeout: u64, rate: u32) -> ValidationResult {
    let mut result = validate_url(url);
    result.merge(validate_threads(threads));
    result.merge(validate_timeout(timeout));
    result.merge(validate_rate_limit(rate));
    result
}

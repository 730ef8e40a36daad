//! نظام التسجيل
//! تهيئة `env_logger` للمكتبة ومسجل ملون لرسائل المستخدم

use colored::{ColoredString, Colorize};
use log::LevelFilter;

/// مستوى التسجيل حسب عدد مرات تكرار -v
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// تهيئة المسجل (متغير البيئة RUST_LOG يتقدم على المستوى المحدد)
pub fn init(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for(verbosity))
        .format_timestamp_millis()
        .parse_default_env();

    // قد يكون مهيأً مسبقًا (الاختبارات أو الاستدعاء المتكرر)
    let _ = builder.try_init();
}

/// نوع رسالة الواجهة
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// `[*]`
    Info,
    /// `[+]`
    Success,
    /// `[!]`
    Warn,
    /// `[-]`
    Error,
    /// تفاصيل الوضع التفصيلي
    Debug,
}

impl Tone {
    /// stdout مخصص للنتائج؛ التحذيرات والأخطاء والتفاصيل إلى stderr
    pub fn to_stderr(self) -> bool {
        matches!(self, Self::Warn | Self::Error | Self::Debug)
    }

    fn render(self, msg: &str) -> ColoredString {
        match self {
            Self::Info => format!("[*] {msg}").cyan(),
            Self::Success => format!("[+] {msg}").bright_green(),
            Self::Warn => format!("[!] {msg}").yellow(),
            Self::Error => format!("[-] {msg}").bright_red(),
            Self::Debug => format!("    {msg}").white(),
        }
    }
}

/// مسجل ملون لرسائل الواجهة
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    verbose: bool,
}

impl Logger {
    /// إنشاء مسجل
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn emit(self, tone: Tone, msg: &str) {
        let line = tone.render(msg);
        if tone.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// معلومة
    pub fn info(&self, msg: &str) {
        self.emit(Tone::Info, msg);
    }

    /// نجاح
    pub fn success(&self, msg: &str) {
        self.emit(Tone::Success, msg);
    }

    /// تحذير
    pub fn warn(&self, msg: &str) {
        self.emit(Tone::Warn, msg);
    }

    /// خطأ
    pub fn error(&self, msg: &str) {
        self.emit(Tone::Error, msg);
    }

    /// تفاصيل (في الوضع التفصيلي فقط)
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.emit(Tone::Debug, msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0);
        init(3);
    }

    #[test]
    fn test_logger_debug_respects_verbosity() {
        Logger::new(false).debug("hidden");
        Logger::new(true).debug("shown");
    }

    #[test]
    fn test_diagnostics_stay_off_stdout() {
        assert!(Tone::Warn.to_stderr());
        assert!(Tone::Error.to_stderr());
        assert!(Tone::Debug.to_stderr());
        assert!(!Tone::Info.to_stderr());
        assert!(!Tone::Success.to_stderr());
    }

    #[test]
    fn test_tone_prefixes() {
        colored::control::set_override(false);
        assert_eq!(Tone::Warn.render("x").to_string(), "[!] x");
        assert_eq!(Tone::Success.render("ok").to_string(), "[+] ok");
        assert_eq!(Tone::Debug.render("d").to_string(), "    d");
    }
}

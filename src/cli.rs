//! معالج سطر الأوامر لـ RedFox Form
//! يستخدم Clap لتحليل الوسائط

use clap::{ArgAction, Parser, Subcommand};

/// الوسائط الأساسية
#[derive(Parser, Debug)]
#[command(
    name = "redfox-form",
    author = "RedFox Security Team",
    version,
    about = "أداة اختبار نماذج تسجيل الدخول عبر الويب",
    long_about = r#"
RedFox Form - اختبار بيانات الاعتماد على نماذج تسجيل الدخول

للاستخدام في اختبارات الاختراق المصرح بها فقط.

أمثلة:
  redfox-form scan --url http://target.local/login -u admin -P passwords.txt
  redfox-form scan --url target.local -u users.txt -P rockyou.txt -t 10 --rate 20
  redfox-form forms --url http://target.local/login
    "#
)]
pub struct Cli {
    /// الأمر المطلوب تنفيذه
    #[command(subcommand)]
    pub command: Command,

    /// الوضع التفصيلي (كرر لمزيد من التفاصيل)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// الوضع الهادئ (عدم عرض البانر)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// الأوامر المتاحة
#[derive(Subcommand, Debug)]
pub enum Command {
    /// اختبار بيانات الاعتماد على نموذج تسجيل الدخول
    #[command(arg_required_else_help = true)]
    Scan(ScanArgs),

    /// عرض النماذج المكتشفة في الصفحة فقط
    Forms {
        /// رابط الصفحة
        #[arg(long, value_name = "URL")]
        url: String,

        /// مهلة الطلب بالثواني
        #[arg(long, default_value_t = 10, value_name = "SECONDS")]
        timeout: u64,
    },

    /// التحقق من صحة الرابط والإعدادات
    Validate {
        /// رابط الهدف للتحقق
        #[arg(long, value_name = "URL")]
        url: String,
    },
}

/// وسائط أمر الفحص
#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// رابط صفحة تسجيل الدخول (مطلوب)
    #[arg(long, value_name = "URL")]
    pub url: String,

    /// اسم مستخدم، قائمة مفصولة بفواصل، أو ملف
    #[arg(short = 'u', long, default_value = "usernames.txt", value_name = "USER|FILE")]
    pub users: String,

    /// كلمة مرور، قائمة مفصولة بفواصل، أو ملف
    #[arg(short = 'P', long, default_value = "passwords.txt", value_name = "PASS|FILE")]
    pub passwords: String,

    /// عدد العمال المتوازيين
    #[arg(short, long, default_value_t = 5, value_name = "NUM")]
    pub threads: usize,

    /// مهلة الطلب بالثواني
    #[arg(long, default_value_t = 10, value_name = "SECONDS")]
    pub timeout: u64,

    /// الحد الإجمالي للطلبات في الثانية
    #[arg(long, default_value_t = 100, value_name = "RPS")]
    pub rate: u32,

    /// رقم النموذج كما يعرضه أمر forms (الافتراضي: أول نموذج تسجيل دخول)
    #[arg(long, value_name = "INDEX")]
    pub form: Option<usize>,

    /// خادم بروكسي (مثال: http://127.0.0.1:8080)
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// طباعة النتيجة بصيغة JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// الحصول على مستوى التفاصيل
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// هل الوضع التفصيلي مفعل
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }
}

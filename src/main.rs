//! RedFox Form - اختبار نماذج تسجيل الدخول عبر الويب
//! مكتوبة بلغة Rust للأداء الأمثل

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::runtime::Runtime;

use redfox_form::bruteforcer::{EngineConfig, FoundCredential};
use redfox_form::http_client::ClientSettings;
use redfox_form::progress::ProgressTracker;
use redfox_form::scanner::{select_form, TargetScanner};
use redfox_form::utils::logger::Logger;
use redfox_form::{parser, validator};

mod cli;

use cli::{Cli, Command, ScanArgs};

/// دالة رئيسية غير متزامنة
async fn async_main(cli: Cli) -> Result<()> {
    let verbose = cli.is_verbose();
    let logger = Logger::new(verbose);

    match cli.command {
        Command::Scan(args) => run_scan(args, verbose, &logger).await?,

        Command::Forms { url, timeout } => {
            let settings = ClientSettings {
                timeout: Duration::from_secs(timeout),
                ..ClientSettings::default()
            };
            let scanner = TargetScanner::connect(&url, &settings, verbose)
                .await
                .context("فشل في الاتصال بالهدف")?;

            let forms = scanner.find_forms();
            if forms.is_empty() {
                logger.warn("لم يتم العثور على نماذج تسجيل دخول");
            }
            for form in &forms {
                let marker = if form.is_login_form() {
                    "[login]".bright_green()
                } else {
                    "[partial]".yellow()
                };
                println!("{:3}. {} {}", form.index, marker, form.description());
            }
        }

        Command::Validate { url } => {
            logger.info("التحقق من الهدف");

            let result = validator::validate_url(&url);
            result.display();
            if !result.is_valid {
                anyhow::bail!("الهدف غير صالح");
            }
        }
    }

    Ok(())
}

/// تنفيذ الفحص الكامل
async fn run_scan(args: ScanArgs, verbose: bool, logger: &Logger) -> Result<()> {
    let mut report = validator::validate_target(&args.url, args.threads, args.timeout, args.rate);
    if let Some(proxy) = &args.proxy {
        report.merge(validator::validate_proxy(proxy));
    }
    check_validation(&report)?;

    let usernames = parser::parse_input(&args.users)
        .await
        .with_context(|| format!("فشل في تحميل المستخدمين: {}", args.users))?;
    let passwords = parser::parse_input(&args.passwords)
        .await
        .with_context(|| format!("فشل في تحميل كلمات المرور: {}", args.passwords))?;

    if !args.json {
        logger.info(&format!("الهدف: {}", args.url));
        logger.info(&format!(
            "{} مستخدم، {} كلمة مرور، {} عامل",
            usernames.len(),
            passwords.len(),
            args.threads
        ));
    }

    let settings = ClientSettings {
        timeout: Duration::from_secs(args.timeout),
        proxy: args.proxy.clone(),
        ..ClientSettings::default()
    };
    let scanner = TargetScanner::connect(&args.url, &settings, verbose)
        .await
        .context("فشل في الاتصال بالهدف")?;

    let forms = scanner.find_forms();
    let form = select_form(&forms, args.form)
        .context("لم يتم العثور على نموذج تسجيل دخول (حدد نموذجًا بـ --form)")?;

    if !args.json {
        logger.success(&format!("الاتصال ناجح: {}", scanner.base_url()));
        logger.info(&format!("النموذج المستهدف: {}", form.description()));
    }

    let total = usernames.len() * passwords.len();
    let tracker = Arc::new(if args.json {
        ProgressTracker::hidden(total)
    } else {
        ProgressTracker::new(total, verbose)
    });

    let config = EngineConfig {
        concurrency: args.threads,
        rate_limit: args.rate,
        verbose,
    };
    let found = scanner
        .bruteforcer(config)
        .with_observer(Arc::clone(&tracker) as _)
        .run(&usernames, &passwords, form)
        .await
        .context("فشل في تنفيذ الفحص")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    display_result(found.as_ref(), logger);
    show_statistics(&tracker, total);
    Ok(())
}

fn check_validation(report: &validator::ValidationResult) -> Result<()> {
    for warning in &report.warnings {
        log::warn!("{warning}");
    }
    if report.is_valid {
        Ok(())
    } else {
        report.display();
        anyhow::bail!("إعدادات غير صالحة")
    }
}

/// عرض البانر
fn show_banner() {
    let banner = r"
    ██████╗ ███████╗██████╗ ███████╗ ██████╗ ██╗  ██╗
    ██╔══██╗██╔════╝██╔══██╗██╔════╝██╔═══██╗╚██╗██╔╝
    ██████╔╝█████╗  ██║  ██║█████╗  ██║   ██║ ╚███╔╝
    ██╔══██╗██╔══╝  ██║  ██║██╔══╝  ██║   ██║ ██╔██╗
    ██║  ██║███████╗██████╔╝██║     ╚██████╔╝██╔╝ ██╗
    ╚═╝  ╚═╝╚══════╝╚═════╝ ╚═╝      ╚═════╝ ╚═╝  ╚═╝
    "
    .bright_red();

    println!("{banner}");
    println!(
        "    {}",
        format!("RedFox Form v{} - Web Login Auditor", redfox_form::version()).bright_white()
    );
    println!("    {}\n", "=".repeat(47).bright_red());
}

/// التنبيه القانوني
fn show_disclaimer() {
    eprintln!(
        "{}",
        "[!] للاستخدام في اختبارات الاختراق المصرح بها فقط. \
         استخدام هذه الأداة ضد أنظمة دون إذن مسبق غير قانوني، والمستخدم وحده مسؤول عن أفعاله."
            .yellow()
    );
}

/// عرض النتيجة
fn display_result(found: Option<&FoundCredential>, logger: &Logger) {
    match found {
        Some(cred) => {
            println!("\n{}", "بيانات اعتماد صالحة:".bright_green().bold());
            println!("{}", "-".repeat(60).bright_blue());
            println!("  المستخدم:     {}", cred.username.bright_cyan());
            println!("  كلمة المرور:  {}", cred.password.bright_yellow());
            println!("  الوقت:        {}", cred.timestamp.to_rfc3339());
        }
        None => logger.warn("لم يتم العثور على بيانات اعتماد صالحة"),
    }
}

/// عرض الإحصائيات
fn show_statistics(tracker: &ProgressTracker, total: usize) {
    println!("\n{}", "إحصائيات الفحص:".bright_magenta().bold());
    println!("{}", "=".repeat(60).bright_blue());
    println!("الوقت المستغرق:          {:.2?}", tracker.elapsed());
    println!(
        "المحاولات المنفذة:      {} من {total} ({:.1}%)",
        tracker.completed(),
        tracker.percentage()
    );
    println!("المحاولات المتعذرة:     {}", tracker.skipped().to_string().bright_red());
    println!("معدل المحاولات/ثانية:  {}", format!("{:.2}", tracker.rate()).bright_yellow());
}

/// نقطة الدخول الرئيسية
fn main() {
    let cli = <Cli as clap::Parser>::parse();

    redfox_form::init(cli.verbosity());

    let json = matches!(&cli.command, Command::Scan(args) if args.json);
    if !cli.quiet && !json {
        show_banner();
    }
    show_disclaimer();

    // إنشاء وقت تشغيل Tokio
    let rt = Runtime::new().unwrap_or_else(|e| {
        eprintln!("فشل في إنشاء وقت التشغيل: {e}");
        process::exit(1);
    });

    if let Err(e) = rt.block_on(async_main(cli)) {
        Logger::new(false).error(&format!("خطأ: {e}"));
        for cause in e.chain().skip(1) {
            eprintln!("  - {cause}");
        }
        process::exit(1);
    }
}

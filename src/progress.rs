//! تتبع التقدم
//! يستقبل حدثًا لكل محاولة مكتملة من كل عامل ويعرضه للمستخدم

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

/// نتيجة محاولة واحدة كما يراها المراقب
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// المصنف قرر النجاح
    Accepted,
    /// المصنف قرر الرفض
    Rejected,
    /// تعذر إتمام الطلب (لا يُعاد)
    Skipped(String),
}

/// حدث محاولة مكتملة
#[derive(Debug, Clone, Copy)]
pub struct AttemptEvent<'a> {
    /// رقم العامل
    pub worker_id: usize,
    /// اسم المستخدم
    pub username: &'a str,
    /// كلمة المرور
    pub password: &'a str,
    /// النتيجة
    pub outcome: &'a AttemptOutcome,
    /// عدد المحاولات التي أجراها هذا العامل للمستخدم الحالي
    pub tested_for_user: usize,
    /// إجمالي محاولات هذا العامل
    pub tested_total: usize,
}

/// مستقبل أحداث التقدم (يُستدعى من عدة عمال بالتوازي)
pub trait ProgressObserver: Send + Sync {
    /// عامل بدأ اختبار مستخدم جديد
    fn on_user_started(&self, _worker_id: usize, _username: &str) {}

    /// اكتملت محاولة
    fn on_attempt(&self, event: &AttemptEvent<'_>);

    /// انتهى التشغيل
    fn on_finished(&self) {}
}

/// مراقب صامت
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl ProgressObserver for SilentObserver {
    fn on_attempt(&self, _event: &AttemptEvent<'_>) {}
}

/// متعقب التقدم بشريط indicatif
pub struct ProgressTracker {
    pb: ProgressBar,
    start_time: Instant,
    total_items: usize,
    completed: AtomicUsize,
    skipped: AtomicUsize,
    verbose: bool,
}

impl ProgressTracker {
    /// إنشاء متعقب لعدد معين من المحاولات
    pub fn new(total_items: usize, verbose: bool) -> Self {
        let pb = ProgressBar::new(total_items as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }

        Self {
            pb,
            start_time: Instant::now(),
            total_items,
            completed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            verbose,
        }
    }

    /// متعقب بدون عرض (للاختبارات وللوضع الهادئ)
    pub fn hidden(total_items: usize) -> Self {
        let tracker = Self::new(total_items, false);
        tracker.pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        tracker
    }

    /// عدد المحاولات المكتملة
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// عدد المحاولات التي تعذر إتمامها
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }

    /// النسبة المئوية للتقدم
    pub fn percentage(&self) -> f64 {
        if self.total_items == 0 {
            100.0
        } else {
            (self.completed() as f64 / self.total_items as f64) * 100.0
        }
    }

    /// متوسط المحاولات في الثانية
    pub fn rate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.completed() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// الوقت المتبقي التقديري
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.rate();
        if self.completed() == 0 || rate <= 0.0 {
            return None;
        }

        let remaining = self.total_items.saturating_sub(self.completed()) as f64 / rate;
        Some(Duration::from_secs_f64(remaining))
    }

    /// الوقت المنقضي
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl ProgressObserver for ProgressTracker {
    fn on_user_started(&self, worker_id: usize, username: &str) {
        if self.verbose {
            self.pb.println(format!(
                "{}",
                format!("[Worker {worker_id}] اختبار المستخدم: {username}").cyan()
            ));
        }
    }

    fn on_attempt(&self, event: &AttemptEvent<'_>) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        self.pb.inc(1);

        match event.outcome {
            AttemptOutcome::Skipped(reason) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                if self.verbose {
                    self.pb.println(format!(
                        "{}",
                        format!(
                            "[!] فشل الطلب لـ {}:{} - {reason}",
                            event.username, event.password
                        )
                        .yellow()
                    ));
                }
            }
            AttemptOutcome::Accepted => {
                self.pb.println(format!(
                    "{}",
                    format!("[+] [Worker {}] {}:{}", event.worker_id, event.username, event.password)
                        .bright_green()
                ));
            }
            AttemptOutcome::Rejected => {}
        }

        if event.tested_for_user % 10 == 0 {
            self.pb.set_message(format!(
                "[Worker {}] {} محاولة لـ {}",
                event.worker_id, event.tested_for_user, event.username
            ));
        }
        if completed % 100 == 0 {
            let eta = self
                .eta()
                .map_or_else(|| "?".to_string(), |eta| HumanDuration(eta).to_string());
            self.pb.set_message(format!(
                "{:.1}% ، {:.1}/s ، متبقٍ {eta}",
                self.percentage(),
                self.rate()
            ));
        }
    }

    fn on_finished(&self) {
        self.pb.finish_and_clear();
        log::info!(
            "اكتمل: {} محاولة في {} ({:.1} محاولة/ثانية، {} متعذرة)",
            self.completed(),
            HumanDuration(self.elapsed()),
            self.rate(),
            self.skipped()
        );
    }
}

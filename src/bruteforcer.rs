//! محرك اختبار بيانات الاعتماد
//! مجموعة ثابتة من العمال تسحب الأزواج من طابور محدود، بحد معدل مشترك،
//! وتتوقف جميعها فور أن يثبت أحدها نجاح زوج واحد.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::classifier::SuccessClassifier;
use crate::error::ConfigError;
use crate::form::Form;
use crate::http_client::Probe;
use crate::limiter::RateLimiter;
use crate::progress::{AttemptEvent, AttemptOutcome, ProgressObserver, SilentObserver};

/// زوج مرشح للاختبار
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestJob {
    /// اسم المستخدم
    pub username: String,
    /// كلمة المرور
    pub password: String,
}

/// بيانات اعتماد صالحة (واحدة على الأكثر لكل تشغيل)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FoundCredential {
    /// اسم المستخدم
    pub username: String,
    /// كلمة المرور
    pub password: String,
    /// لحظة الاكتشاف
    pub timestamp: DateTime<Utc>,
}

/// إعدادات المحرك
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// عدد العمال
    pub concurrency: usize,
    /// الحد الإجمالي للطلبات في الثانية
    pub rate_limit: u32,
    /// تسجيل أخطاء النقل بمستوى تحذير
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            rate_limit: 100,
            verbose: false,
        }
    }
}

impl EngineConfig {
    /// التحقق من الإعدادات قبل التشغيل
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency));
        }
        if self.rate_limit == 0 {
            return Err(ConfigError::InvalidRateLimit(self.rate_limit));
        }
        Ok(())
    }
}

/// توليد الأزواج بترتيب المستخدم أولًا
pub fn credential_pairs<'a>(
    usernames: &'a [String],
    passwords: &'a [String],
) -> impl Iterator<Item = TestJob> + 'a {
    usernames.iter().flat_map(move |username| {
        passwords.iter().map(move |password| TestJob {
            username: username.clone(),
            password: password.clone(),
        })
    })
}

/// الحالة المشتركة بين العمال خلال تشغيل واحد
struct RunContext {
    client: Arc<dyn Probe>,
    classifier: Arc<SuccessClassifier>,
    observer: Arc<dyn ProgressObserver>,
    form: Form,
    limiter: RateLimiter,
    stop: CancellationToken,
    found: OnceCell<FoundCredential>,
    verbose: bool,
}

impl RunContext {
    /// اختبار زوج واحد: بناء البيانات، الإرسال، ثم التصنيف
    async fn test_credential(&self, job: &TestJob) -> AttemptOutcome {
        let payload = self.form.build_payload(&job.username, &job.password);

        match self.client.post_form(&self.form.action, &payload).await {
            Ok(response) => {
                if self.classifier.classify(&response, &self.form.action).is_success() {
                    AttemptOutcome::Accepted
                } else {
                    AttemptOutcome::Rejected
                }
            }
            Err(e) => {
                if self.verbose {
                    log::warn!("فشل الطلب لـ {}:{} - {e}", job.username, job.password);
                } else {
                    log::debug!("فشل الطلب لـ {}:{} - {e}", job.username, job.password);
                }
                AttemptOutcome::Skipped(e.to_string())
            }
        }
    }

    /// محاولة حجز "أول نجاح"؛ الفائز وحده يطلق إشارة التوقف
    fn claim(&self, job: TestJob) -> bool {
        let credential = FoundCredential {
            username: job.username,
            password: job.password,
            timestamp: Utc::now(),
        };

        match self.found.set(credential) {
            Ok(()) => {
                self.stop.cancel();
                true
            }
            Err(late) => {
                log::debug!(
                    "تم تجاهل نجاح متأخر {}:{} (سبقه عامل آخر)",
                    late.username,
                    late.password
                );
                false
            }
        }
    }
}

/// تقدم العامل المحلي لكل مستخدم
#[derive(Default)]
struct WorkerProgress {
    current_user: Option<String>,
    tested_for_user: usize,
    tested_total: usize,
}

impl WorkerProgress {
    /// يعيد true إذا بدأ مستخدم جديد
    fn advance(&mut self, username: &str) -> bool {
        let new_user = self.current_user.as_deref() != Some(username);
        if new_user {
            self.current_user = Some(username.to_string());
            self.tested_for_user = 0;
        }
        self.tested_for_user += 1;
        self.tested_total += 1;
        new_user
    }
}

async fn next_job(jobs: &Mutex<mpsc::Receiver<TestJob>>) -> Option<TestJob> {
    jobs.lock().await.recv().await
}

async fn worker(id: usize, ctx: Arc<RunContext>, jobs: Arc<Mutex<mpsc::Receiver<TestJob>>>) {
    let mut progress = WorkerProgress::default();

    loop {
        let job = tokio::select! {
            biased;
            () = ctx.stop.cancelled() => break,
            job = next_job(&jobs) => job,
        };
        let Some(job) = job else { break };

        tokio::select! {
            biased;
            () = ctx.stop.cancelled() => break,
            () = ctx.limiter.acquire() => {}
        }

        // آخر فحص قبل أي نشاط شبكي
        if ctx.stop.is_cancelled() {
            break;
        }

        if progress.advance(&job.username) {
            ctx.observer.on_user_started(id, &job.username);
        }

        let outcome = ctx.test_credential(&job).await;

        ctx.observer.on_attempt(&AttemptEvent {
            worker_id: id,
            username: &job.username,
            password: &job.password,
            outcome: &outcome,
            tested_for_user: progress.tested_for_user,
            tested_total: progress.tested_total,
        });

        if outcome == AttemptOutcome::Accepted {
            if ctx.claim(job) {
                log::info!("[Worker {id}] عُثر على بيانات اعتماد صالحة");
            }
            break;
        }
    }

    log::trace!("[Worker {id}] انتهى بعد {} محاولة", progress.tested_total);
}

/// محرك التخمين
pub struct Bruteforcer {
    client: Arc<dyn Probe>,
    classifier: Arc<SuccessClassifier>,
    observer: Arc<dyn ProgressObserver>,
    config: EngineConfig,
}

impl Bruteforcer {
    /// إنشاء محرك جديد
    pub fn new(client: Arc<dyn Probe>, classifier: SuccessClassifier, config: EngineConfig) -> Self {
        Self {
            client,
            classifier: Arc::new(classifier),
            observer: Arc::new(SilentObserver),
            config,
        }
    }

    /// تعيين مراقب التقدم
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// تشغيل الاختبار حتى أول نجاح أو نفاد الأزواج
    ///
    /// أخطاء الإعدادات فقط تُعاد كخطأ؛ فشل الطلبات الفردية يُسجل ويُتجاوز.
    pub async fn run(
        &self,
        usernames: &[String],
        passwords: &[String],
        form: &Form,
    ) -> Result<Option<FoundCredential>, ConfigError> {
        self.config.validate()?;
        if !form.is_testable() {
            return Err(ConfigError::UntestableForm {
                action: form.action.to_string(),
            });
        }

        let total = usernames.len() * passwords.len();
        log::info!(
            "بدء الاختبار: {} مستخدم × {} كلمة مرور = {total} محاولة، {} عامل، {} طلب/ثانية",
            usernames.len(),
            passwords.len(),
            self.config.concurrency,
            self.config.rate_limit
        );

        let ctx = Arc::new(RunContext {
            client: Arc::clone(&self.client),
            classifier: Arc::clone(&self.classifier),
            observer: Arc::clone(&self.observer),
            form: form.clone(),
            limiter: RateLimiter::new(self.config.rate_limit),
            stop: CancellationToken::new(),
            found: OnceCell::new(),
            verbose: self.config.verbose,
        });

        log::debug!("حد المعدل الفعلي: {} طلب/ثانية", ctx.limiter.rate());

        let (tx, rx) = mpsc::channel::<TestJob>(self.config.concurrency * 2);
        let rx = Arc::new(Mutex::new(rx));

        let workers: Vec<_> = (0..self.config.concurrency)
            .map(|id| tokio::spawn(worker(id, Arc::clone(&ctx), Arc::clone(&rx))))
            .collect();

        // الموزع: يتوقف فور إشارة التوقف ولو في منتصف مستخدم
        let mut dispatched = 0usize;
        for job in credential_pairs(usernames, passwords) {
            if ctx.stop.is_cancelled() {
                break;
            }
            let sent = tokio::select! {
                biased;
                () = ctx.stop.cancelled() => false,
                res = tx.send(job) => res.is_ok(),
            };
            if !sent {
                break;
            }
            dispatched += 1;
        }
        drop(tx);

        for handle in workers {
            if let Err(e) = handle.await {
                log::error!("توقف عامل بشكل غير متوقع: {e}");
            }
        }
        ctx.observer.on_finished();

        log::debug!("تم توزيع {dispatched} من {total} زوج");

        Ok(ctx.found.get().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::http_client::ProbeResponse;
    use async_trait::async_trait;
    use parking_lot::Mutex as SyncMutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use url::Url;

    const LOGIN_PAGE: &str = "<html><head><title>Login</title></head><body><form></form></body></html>";

    fn action() -> Url {
        Url::parse("http://target.local/login").unwrap()
    }

    fn login_form() -> Form {
        Form::new(action(), crate::form::FormMethod::Post)
            .with_username_field("user")
            .with_password_field("pass")
            .with_field("csrf", "t0k3n")
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    /// هدف محاكى: يقبل أزواجًا محددة ويسجل كل طلب
    struct MockTarget {
        valid: HashSet<(String, String)>,
        broken: HashSet<(String, String)>,
        delay: Duration,
        attempts: SyncMutex<Vec<(String, String)>>,
        stop_seen: AtomicBool,
        probes_after_stop: AtomicUsize,
    }

    impl MockTarget {
        fn new(valid: &[(&str, &str)]) -> Self {
            Self {
                valid: valid
                    .iter()
                    .map(|(u, p)| ((*u).to_string(), (*p).to_string()))
                    .collect(),
                broken: HashSet::new(),
                delay: Duration::ZERO,
                attempts: SyncMutex::new(Vec::new()),
                stop_seen: AtomicBool::new(false),
                probes_after_stop: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn with_broken(mut self, pairs: &[(&str, &str)]) -> Self {
            self.broken = pairs
                .iter()
                .map(|(u, p)| ((*u).to_string(), (*p).to_string()))
                .collect();
            self
        }

        fn attempts(&self) -> Vec<(String, String)> {
            self.attempts.lock().clone()
        }
    }

    #[async_trait]
    impl Probe for MockTarget {
        async fn get(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
            Ok(ProbeResponse::ok(url.clone(), LOGIN_PAGE))
        }

        async fn post_form(
            &self,
            url: &Url,
            fields: &HashMap<String, String>,
        ) -> Result<ProbeResponse, ProbeError> {
            if self.stop_seen.load(Ordering::SeqCst) {
                self.probes_after_stop.fetch_add(1, Ordering::SeqCst);
            }
            let user = fields.get("user").cloned().unwrap_or_default();
            let pass = fields.get("pass").cloned().unwrap_or_default();
            assert_eq!(fields.get("csrf").map(String::as_str), Some("t0k3n"));
            self.attempts.lock().push((user.clone(), pass.clone()));

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let key = (user, pass);
            if self.broken.contains(&key) {
                // خطأ نقل حقيقي من reqwest يصعب توليده هنا؛ المهلة تكفي
                return Err(ProbeError::Timeout(Duration::from_secs(10)));
            }
            let body = if self.valid.contains(&key) {
                "<title>Login</title><h1>Welcome admin</h1>"
            } else {
                "<title>Login</title><p>Invalid username or password</p>"
            };
            Ok(ProbeResponse::ok(url.clone(), body))
        }
    }

    /// مراقب يسجل النتائج ويعلم الهدف المحاكى بلحظة النجاح
    #[derive(Default)]
    struct Recorder {
        events: SyncMutex<Vec<(String, String, AttemptOutcome)>>,
        users_started: SyncMutex<Vec<(usize, String)>>,
        finished: AtomicBool,
        target: Option<Arc<MockTarget>>,
    }

    impl ProgressObserver for Recorder {
        fn on_user_started(&self, worker_id: usize, username: &str) {
            self.users_started.lock().push((worker_id, username.to_string()));
        }

        fn on_attempt(&self, event: &AttemptEvent<'_>) {
            if *event.outcome == AttemptOutcome::Accepted {
                if let Some(target) = &self.target {
                    target.stop_seen.store(true, Ordering::SeqCst);
                }
            }
            self.events.lock().push((
                event.username.to_string(),
                event.password.to_string(),
                event.outcome.clone(),
            ));
        }

        fn on_finished(&self) {
            self.finished.store(true, Ordering::SeqCst);
        }
    }

    fn engine(target: Arc<MockTarget>, config: EngineConfig) -> Bruteforcer {
        Bruteforcer::new(target, SuccessClassifier::new(LOGIN_PAGE), config)
    }

    fn config(concurrency: usize, rate_limit: u32) -> EngineConfig {
        EngineConfig {
            concurrency,
            rate_limit,
            verbose: false,
        }
    }

    #[test]
    fn test_credential_pairs_username_major() {
        let users = strings(&["admin", "bob"]);
        let passwords = strings(&["123", "admin", "root"]);

        let pairs: Vec<_> = credential_pairs(&users, &passwords)
            .map(|j| (j.username, j.password))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("admin".to_string(), "123".to_string()),
                ("admin".to_string(), "admin".to_string()),
                ("admin".to_string(), "root".to_string()),
                ("bob".to_string(), "123".to_string()),
                ("bob".to_string(), "admin".to_string()),
                ("bob".to_string(), "root".to_string()),
            ]
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(config(1, 1).validate().is_ok());
        assert_eq!(config(0, 10).validate(), Err(ConfigError::InvalidConcurrency(0)));
        assert_eq!(config(4, 0).validate(), Err(ConfigError::InvalidRateLimit(0)));
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_any_probe() {
        let target = Arc::new(MockTarget::new(&[]));
        let users = strings(&["admin"]);
        let passwords = strings(&["admin"]);

        let err = engine(target.clone(), config(0, 10))
            .run(&users, &passwords, &login_form())
            .await
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidConcurrency(0));

        let err = engine(target.clone(), config(2, 0))
            .run(&users, &passwords, &login_form())
            .await
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidRateLimit(0));

        assert!(target.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_untestable_form_rejected() {
        let target = Arc::new(MockTarget::new(&[]));
        let form = Form::new(action(), crate::form::FormMethod::Post).with_field("q", "x");

        let err = engine(target.clone(), config(2, 10))
            .run(&strings(&["a"]), &strings(&["b"]), &form)
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigError::UntestableForm { .. }));
        assert!(target.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_wordlists_return_none() {
        let target = Arc::new(MockTarget::new(&[]));

        let found = engine(target.clone(), config(3, 100))
            .run(&[], &strings(&["a"]), &login_form())
            .await
            .unwrap();

        assert!(found.is_none());
        assert!(target.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_exhaustive_run_tries_every_pair_once() {
        let target = Arc::new(MockTarget::new(&[]));
        let users = strings(&["u1", "u2", "u3", "u4"]);
        let passwords = strings(&["p1", "p2", "p3", "p4", "p5"]);
        let recorder = Arc::new(Recorder::default());

        let found = engine(target.clone(), config(4, 1000))
            .with_observer(recorder.clone())
            .run(&users, &passwords, &login_form())
            .await
            .unwrap();

        assert!(found.is_none());

        let mut attempts = target.attempts();
        attempts.sort();
        let mut expected: Vec<_> = credential_pairs(&users, &passwords)
            .map(|j| (j.username, j.password))
            .collect();
        expected.sort();
        assert_eq!(attempts, expected);

        let events = recorder.events.lock();
        assert_eq!(events.len(), 20);
        assert!(events.iter().all(|(_, _, o)| *o == AttemptOutcome::Rejected));
        assert!(recorder.finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_single_worker_follows_dispatch_order() {
        let target = Arc::new(MockTarget::new(&[]));
        let users = strings(&["alice", "bob", "carol"]);
        let passwords = strings(&["1", "2", "3"]);

        engine(target.clone(), config(1, 1000))
            .run(&users, &passwords, &login_form())
            .await
            .unwrap();

        let expected: Vec<_> = credential_pairs(&users, &passwords)
            .map(|j| (j.username, j.password))
            .collect();
        assert_eq!(target.attempts(), expected);
    }

    #[tokio::test]
    async fn test_end_to_end_admin_admin() {
        let target = Arc::new(MockTarget::new(&[("admin", "admin")]));
        let recorder = Arc::new(Recorder::default());
        let users = strings(&["admin", "bob"]);
        let passwords = strings(&["123", "admin"]);

        let found = engine(target.clone(), config(1, 100))
            .with_observer(recorder.clone())
            .run(&users, &passwords, &login_form())
            .await
            .unwrap()
            .expect("يجب العثور على admin:admin");

        assert_eq!(found.username, "admin");
        assert_eq!(found.password, "admin");

        let events = recorder.events.lock().clone();
        assert_eq!(
            events,
            vec![
                ("admin".to_string(), "123".to_string(), AttemptOutcome::Rejected),
                ("admin".to_string(), "admin".to_string(), AttemptOutcome::Accepted),
            ]
        );
        // bob لم يُختبر بعد النجاح
        assert!(target.attempts().iter().all(|(u, _)| u == "admin"));
    }

    #[tokio::test]
    async fn test_end_to_end_later_pairs_recorded_as_failures() {
        // الزوج الصالح هو الأخير في الترتيب
        let target = Arc::new(MockTarget::new(&[("bob", "admin")]));
        let recorder = Arc::new(Recorder::default());

        let found = engine(target.clone(), config(1, 100))
            .with_observer(recorder.clone())
            .run(&strings(&["admin", "bob"]), &strings(&["123", "admin"]), &login_form())
            .await
            .unwrap()
            .expect("يجب العثور على bob:admin");

        assert_eq!((found.username.as_str(), found.password.as_str()), ("bob", "admin"));

        let events = recorder.events.lock().clone();
        let outcomes: Vec<_> = events
            .iter()
            .map(|(u, p, o)| (u.as_str(), p.as_str(), o.clone()))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                ("admin", "123", AttemptOutcome::Rejected),
                ("admin", "admin", AttemptOutcome::Rejected),
                ("bob", "123", AttemptOutcome::Rejected),
                ("bob", "admin", AttemptOutcome::Accepted),
            ]
        );

        let started = recorder.users_started.lock().clone();
        assert_eq!(started, vec![(0, "admin".to_string()), (0, "bob".to_string())]);
    }

    #[tokio::test]
    async fn test_transport_errors_are_skipped_not_fatal() {
        let target = Arc::new(
            MockTarget::new(&[("carol", "pw3")]).with_broken(&[("alice", "pw1"), ("bob", "pw2")]),
        );
        let recorder = Arc::new(Recorder::default());
        let users = strings(&["alice", "bob", "carol"]);
        let passwords = strings(&["pw1", "pw2", "pw3"]);

        let found = engine(target.clone(), config(1, 1000))
            .with_observer(recorder.clone())
            .run(&users, &passwords, &login_form())
            .await
            .unwrap()
            .expect("الخطأ في زوج لا يوقف التشغيل");

        assert_eq!(found.username, "carol");

        let events = recorder.events.lock();
        let skipped = events
            .iter()
            .filter(|(_, _, o)| matches!(o, AttemptOutcome::Skipped(_)))
            .count();
        assert_eq!(skipped, 2);

        // لا إعادة محاولة: كل زوج مرة واحدة
        let attempts = target.attempts();
        let unique: HashSet<_> = attempts.iter().cloned().collect();
        assert_eq!(unique.len(), attempts.len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_at_most_one_credential_under_contention() {
        for _ in 0..20 {
            // عدة أزواج صالحة متجاورة مع تأخير مصطنع لزيادة التزامن
            let target = Arc::new(
                MockTarget::new(&[("admin", "a"), ("admin", "b"), ("admin", "c"), ("admin", "d")])
                    .with_delay(Duration::from_millis(5)),
            );
            let recorder = Arc::new(Recorder::default());

            let found = engine(target.clone(), config(8, 10_000))
                .with_observer(recorder.clone())
                .run(&strings(&["admin"]), &strings(&["a", "b", "c", "d", "e", "f"]), &login_form())
                .await
                .unwrap()
                .expect("يجب إرجاع زوج صالح");

            assert_eq!(found.username, "admin");
            assert!(["a", "b", "c", "d"].contains(&found.password.as_str()));

            // كل الأزواج الصالحة ربما نجحت، لكن النتيجة واحدة ومن بينها
            let accepted: Vec<_> = recorder
                .events
                .lock()
                .iter()
                .filter(|(_, _, o)| *o == AttemptOutcome::Accepted)
                .map(|(_, p, _)| p.clone())
                .collect();
            assert!(!accepted.is_empty());
            assert!(accepted.contains(&found.password));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_new_probe_after_success() {
        let target = Arc::new(MockTarget::new(&[("u0", "p3")]).with_delay(Duration::from_millis(5)));
        let recorder = Arc::new(Recorder {
            target: Some(target.clone()),
            ..Recorder::default()
        });
        let users: Vec<String> = (0..10).map(|i| format!("u{i}")).collect();
        let passwords: Vec<String> = (0..50).map(|i| format!("p{i}")).collect();
        let concurrency = 4;

        let found = engine(target.clone(), config(concurrency, 10_000))
            .with_observer(recorder.clone())
            .run(&users, &passwords, &login_form())
            .await
            .unwrap();

        assert_eq!(
            found.map(|c| (c.username, c.password)),
            Some(("u0".to_string(), "p3".to_string()))
        );

        // مسموح بطلب واحد جارٍ لكل عامل لحظة الإشارة
        let late = target.probes_after_stop.load(Ordering::SeqCst);
        assert!(late < concurrency, "طلبات بعد التوقف: {late}");
        assert!(target.attempts().len() < users.len() * passwords.len());
    }

    #[tokio::test]
    async fn test_rate_limit_bounds_wall_clock() {
        let target = Arc::new(MockTarget::new(&[]));
        let users = strings(&["a", "b", "c", "d"]);
        let passwords = strings(&["1", "2", "3", "4", "5"]);
        let rate = 10;
        let total = users.len() * passwords.len();

        let start = std::time::Instant::now();
        engine(target.clone(), config(4, rate))
            .run(&users, &passwords, &login_form())
            .await
            .unwrap();
        let elapsed = start.elapsed();

        // (M - N) / N = (20 - 10) / 10 = ثانية واحدة
        let lower = Duration::from_secs_f64((total as f64 - f64::from(rate)) / f64::from(rate));
        assert!(elapsed + Duration::from_millis(50) >= lower, "{elapsed:?}");
        assert_eq!(target.attempts().len(), total);
    }

    #[test]
    fn test_worker_progress_tracks_user_transitions() {
        let mut progress = WorkerProgress::default();

        assert!(progress.advance("admin"));
        assert!(!progress.advance("admin"));
        assert_eq!(progress.tested_for_user, 2);
        assert!(progress.advance("bob"));
        assert_eq!(progress.tested_for_user, 1);
        assert_eq!(progress.tested_total, 3);
    }

    #[test]
    fn test_found_credential_serializes() {
        let cred = FoundCredential {
            username: "admin".to_string(),
            password: "admin".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(json["username"], "admin");
        assert_eq!(json["password"], "admin");
        assert!(json["timestamp"].is_string());
    }
}

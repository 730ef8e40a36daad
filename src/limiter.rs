//! محدد المعدل (دلو الرموز)
//! مشترك بين جميع العمال: يحد المعدل الإجمالي لا معدل كل عامل

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep_until, Instant};

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// دلو رموز: السعة تساوي المعدل والتعبئة مستمرة
pub struct RateLimiter {
    rate: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// محدد يسمح بـ `per_second` عملية في الثانية (0 يُعامل كـ 1)
    pub fn new(per_second: u32) -> Self {
        let rate = f64::from(per_second.max(1));

        Self {
            rate,
            burst: rate,
            bucket: Mutex::new(Bucket {
                tokens: rate,
                last_refill: Instant::now(),
            }),
        }
    }

    /// المعدل المضبوط
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// حجز رمز واحد وحساب لحظة السماح
    ///
    /// الرصيد قد يصبح سالبًا: كل متصل يحجز دوره فيُخدم المنتظرون بالترتيب.
    fn reserve(&self) -> Instant {
        let mut bucket = self.bucket.lock();
        let now = Instant::now();

        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.burst);
        bucket.last_refill = now;

        bucket.tokens -= 1.0;
        if bucket.tokens >= 0.0 {
            now
        } else {
            now + Duration::from_secs_f64(-bucket.tokens / self.rate)
        }
    }

    /// الانتظار حتى يتوفر رمز
    pub async fn acquire(&self) {
        let ready_at = self.reserve();
        if ready_at > Instant::now() {
            sleep_until(ready_at).await;
        }
    }
}

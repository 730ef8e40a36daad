//! عميل HTTP للفحص
//! يرسل طلبات GET ونماذج POST مع الحفاظ على الكوكيز ومتابعة التحويلات

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Proxy, Response};
use tokio::time::Instant;
use url::Url;

use crate::error::ProbeError;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// استجابة مقروءة بالكامل
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// رمز حالة HTTP
    pub status: u16,

    /// ترويسات الاستجابة
    pub headers: HeaderMap,

    /// العنوان النهائي بعد متابعة التحويلات
    pub final_url: Url,

    /// نص الجسم
    pub body: String,
}

impl ProbeResponse {
    /// استجابة 200 بجسم معين (مفيدة للاختبارات والمحاكاة)
    pub fn ok(final_url: Url, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            final_url,
            body: body.into(),
        }
    }

    async fn read(response: Response) -> Result<Self, ProbeError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response.text().await.map_err(ProbeError::Body)?;

        Ok(Self {
            status,
            headers,
            final_url,
            body,
        })
    }
}

/// القدرة التي يحتاجها المحرك من طبقة الشبكة
#[async_trait]
pub trait Probe: Send + Sync {
    /// طلب GET
    async fn get(&self, url: &Url) -> Result<ProbeResponse, ProbeError>;

    /// إرسال نموذج مرمّز (application/x-www-form-urlencoded)
    async fn post_form(
        &self,
        url: &Url,
        fields: &HashMap<String, String>,
    ) -> Result<ProbeResponse, ProbeError>;
}

/// إعدادات العميل
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// مهلة الطلب الواحد
    pub timeout: Duration,

    /// بروكسي اختياري
    pub proxy: Option<String>,

    /// أقصى عدد للتحويلات
    pub max_redirects: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            proxy: None,
            max_redirects: 10,
        }
    }
}

/// عميل HTTP بجلسة واحدة (مخزن كوكيز مشترك بين جميع الطلبات)
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_headers: HeaderMap,
    request_timeout: Duration,
}

impl HttpClient {
    /// إنشاء عميل جديد
    pub fn new(settings: &ClientSettings) -> Result<Self, ProbeError> {
        let mut builder = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(settings.timeout)
            .tcp_nodelay(true)
            .use_rustls_tls()
            .danger_accept_invalid_certs(true)
            .cookie_store(true)
            .redirect(Policy::limited(settings.max_redirects))
            .pool_max_idle_per_host(100)
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(proxy_url) = &settings.proxy {
            let proxy = Proxy::all(proxy_url).map_err(ProbeError::Transport)?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(ProbeError::Transport)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        Ok(Self {
            client,
            default_headers: headers,
            request_timeout: settings.timeout,
        })
    }

    /// مهلة الطلب المضبوطة
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn log_slow(&self, url: &Url, start: Instant) {
        let elapsed = start.elapsed();
        if elapsed > self.request_timeout / 2 {
            log::warn!("استجابة بطيئة: {elapsed:.2?} - {url}");
        }
    }
}

#[async_trait]
impl Probe for HttpClient {
    async fn get(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        let start = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .headers(self.default_headers.clone())
            .send()
            .await
            .map_err(|e| ProbeError::from_send(e, self.request_timeout))?;

        self.log_slow(url, start);
        ProbeResponse::read(response).await
    }

    async fn post_form(
        &self,
        url: &Url,
        fields: &HashMap<String, String>,
    ) -> Result<ProbeResponse, ProbeError> {
        let start = Instant::now();

        // .form() يضبط Content-Type تلقائيًا
        let response = self
            .client
            .post(url.clone())
            .headers(self.default_headers.clone())
            .form(fields)
            .send()
            .await
            .map_err(|e| ProbeError::from_send(e, self.request_timeout))?;

        self.log_slow(url, start);
        ProbeResponse::read(response).await
    }
}

//! الماسح الرئيسي
//! يتصل بالهدف، يحتفظ بالصفحة الأصلية، ويكتشف نماذج تسجيل الدخول

use std::sync::Arc;

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::bruteforcer::{Bruteforcer, EngineConfig};
use crate::classifier::SuccessClassifier;
use crate::form::{Form, FormMethod};
use crate::http_client::{ClientSettings, HttpClient, Probe};
use crate::utils::logger::Logger;

/// إضافة http:// للعناوين المجردة (العناوين التي تحمل بروتوكولًا تبقى كما هي)
pub fn normalize_target(target: &str) -> String {
    let target = target.trim();
    if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{target}")
    }
}

/// الماسح المرتبط بهدف واحد
pub struct TargetScanner {
    client: Arc<dyn Probe>,
    base_url: Url,
    original_page: String,
    logger: Logger,
}

impl TargetScanner {
    /// الاتصال بالهدف وجلب الصفحة الأصلية
    ///
    /// إذا فشل الاتصال عبر http:// تُعاد المحاولة مرة واحدة عبر https://
    pub async fn connect(target: &str, settings: &ClientSettings, verbose: bool) -> Result<Self> {
        let client: Arc<dyn Probe> =
            Arc::new(HttpClient::new(settings).context("فشل في بناء عميل HTTP")?);

        Self::connect_with(client, target, verbose).await
    }

    /// الاتصال باستخدام عميل جاهز
    pub async fn connect_with(client: Arc<dyn Probe>, target: &str, verbose: bool) -> Result<Self> {
        let logger = Logger::new(verbose);
        let normalized = normalize_target(target);
        let base_url = Url::parse(&normalized).with_context(|| format!("رابط غير صالح: {target}"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("بروتوكول غير مدعوم: {}", base_url.scheme());
        }

        match fetch_page(client.as_ref(), &base_url, &logger).await {
            Ok(page) => Ok(Self {
                client,
                base_url,
                original_page: page,
                logger,
            }),
            Err(e) if base_url.scheme() == "http" => {
                logger.warn(&format!("فشل الاتصال عبر HTTP ({e:#})، المحاولة عبر HTTPS"));

                let mut https_url = base_url.clone();
                https_url
                    .set_scheme("https")
                    .map_err(|()| anyhow::anyhow!("تعذر تحويل الرابط إلى HTTPS: {base_url}"))?;

                let page = fetch_page(client.as_ref(), &https_url, &logger).await?;
                Ok(Self {
                    client,
                    base_url: https_url,
                    original_page: page,
                    logger,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// العنوان بعد التطبيع (وربما التحويل إلى HTTPS)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// نص الصفحة الأصلية قبل أي محاولة
    pub fn original_page(&self) -> &str {
        &self.original_page
    }

    /// العميل المشترك (نفس مخزن الكوكيز)
    pub fn client(&self) -> Arc<dyn Probe> {
        Arc::clone(&self.client)
    }

    /// اكتشاف النماذج في الصفحة الأصلية
    pub fn find_forms(&self) -> Vec<Form> {
        let forms = find_forms(&self.original_page, &self.base_url);

        for form in &forms {
            self.logger.debug(&format!("النموذج {}:", form.index));
            self.logger.debug(&format!("    Action: {}", form.action));
            self.logger.debug(&format!("    Method: {}", form.method));
            if let Some(field) = &form.username_field {
                self.logger.debug(&format!("    Username field: {field}"));
            }
            if let Some(field) = &form.password_field {
                self.logger.debug(&format!("    Password field: {field}"));
            }
        }

        forms
    }

    /// بناء محرك مرتبط بهذا الهدف (الصفحة الأصلية مرجع المصنف)
    pub fn bruteforcer(&self, config: EngineConfig) -> Bruteforcer {
        Bruteforcer::new(
            self.client(),
            SuccessClassifier::new(&self.original_page),
            config,
        )
    }
}

async fn fetch_page(client: &dyn Probe, url: &Url, logger: &Logger) -> Result<String> {
    let response = client
        .get(url)
        .await
        .with_context(|| format!("فشل الاتصال بـ {url}"))?;

    logger.debug(&format!("الاتصال ناجح (الحالة: {})", response.status));
    Ok(response.body)
}

/// اكتشاف نماذج تسجيل الدخول في صفحة HTML
///
/// تُعاد فقط النماذج التي تحتوي على حقل مستخدم أو حقل كلمة مرور.
pub fn find_forms(html: &str, base_url: &Url) -> Vec<Form> {
    let (Ok(form_sel), Ok(input_sel), Ok(select_sel), Ok(option_sel)) = (
        Selector::parse("form"),
        Selector::parse("input"),
        Selector::parse("select"),
        Selector::parse("option"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(&form_sel)
        .enumerate()
        .filter_map(|(index, element)| {
            parse_form(element, index, base_url, &input_sel, &select_sel, &option_sel)
        })
        .collect()
}

fn resolve_action(action: Option<&str>, base_url: &Url) -> Url {
    match action.map(str::trim).filter(|a| !a.is_empty()) {
        Some(action) => base_url.join(action).unwrap_or_else(|e| {
            log::debug!("تعذر حل عنوان النموذج {action}: {e}");
            base_url.clone()
        }),
        None => base_url.clone(),
    }
}

fn looks_like_username(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("user") || lower.contains("login") || lower.contains("email")
}

fn parse_form(
    element: ElementRef<'_>,
    index: usize,
    base_url: &Url,
    input_sel: &Selector,
    select_sel: &Selector,
    option_sel: &Selector,
) -> Option<Form> {
    let attrs = element.value();
    let action = resolve_action(attrs.attr("action"), base_url);
    let method = attrs.attr("method").map_or(FormMethod::Get, FormMethod::from_attr);

    let mut form = Form::new(action, method);
    form.index = index;

    for input in element.select(input_sel) {
        let input = input.value();
        let Some(name) = input.attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let value = input.attr("value").unwrap_or_default();

        match input.attr("type").unwrap_or_default().to_lowercase().as_str() {
            "text" | "email" | "" => {
                if form.username_field.is_none() && looks_like_username(name) {
                    form.username_field = Some(name.to_string());
                }
                form.fields.insert(name.to_string(), String::new());
            }
            "password" => {
                if form.password_field.is_none() {
                    form.password_field = Some(name.to_string());
                }
                form.fields.insert(name.to_string(), String::new());
            }
            _ => {
                form.fields.insert(name.to_string(), value.to_string());
            }
        }
    }

    for select in element.select(select_sel) {
        let Some(name) = select.value().attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };

        let options: Vec<String> = select
            .select(option_sel)
            .map(|option| option.value().attr("value").unwrap_or_default().to_string())
            .collect();

        form.fields
            .insert(name.to_string(), options.first().cloned().unwrap_or_default());

        if form.select_field.is_none() {
            form.select_field = Some(name.to_string());
            form.select_options = options;
        }
    }

    form.is_testable().then_some(form)
}

/// اختيار النموذج المستهدف
///
/// الرقم المطلوب هو ترتيب النموذج في الصفحة (`Form::index`، كما يعرضه أمر `forms`).
/// إن لم يوجد نموذج بهذا الرقم يُختار أول نموذج تسجيل دخول كامل.
pub fn select_form(forms: &[Form], requested: Option<usize>) -> Option<&Form> {
    if let Some(index) = requested {
        if let Some(form) = forms.iter().find(|form| form.index == index) {
            return Some(form);
        }
        let available: Vec<String> = forms.iter().map(|form| form.index.to_string()).collect();
        log::warn!("لا يوجد نموذج بالرقم {index} (المتاح: {})", available.join(", "));
    }

    forms.iter().find(|form| form.is_login_form())
}

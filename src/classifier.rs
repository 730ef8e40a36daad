//! مصنف النجاح
//! يقرر ما إذا كانت الاستجابة تدل على تسجيل دخول ناجح دون وجود مرجع مؤكد.
//!
//! القواعد تُقيَّم بترتيب ثابت وأول قاعدة تطابق تحسم النتيجة:
//! عبارة فشل > عبارة نجاح > تغيّر عنوان الصفحة > تغيّر العنوان النهائي.

use scraper::{Html, Selector};
use url::Url;

use crate::http_client::ProbeResponse;

/// عبارات رفض تسجيل الدخول
pub const FAILURE_PHRASES: &[&str] = &[
    "invalid username or password",
    "invalid credentials",
    "login failed",
    "incorrect username",
    "incorrect password",
    "authentication failed",
    "wrong username",
    "wrong password",
    "bad credentials",
];

/// عبارات تظهر عادةً بعد تسجيل الدخول
pub const SUCCESS_PHRASES: &[&str] = &[
    "logout",
    "log out",
    "sign out",
    "welcome",
    "dashboard",
    "profile",
    "my account",
];

/// حكم المصنف
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// تسجيل دخول ناجح
    Success,
    /// مرفوض
    Failure,
}

impl Verdict {
    /// هل هو نجاح؟
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// المعطيات التي تعمل عليها القواعد
#[derive(Debug)]
pub struct Evidence<'a> {
    /// الجسم بأحرف صغيرة
    pub body_lower: String,
    /// عنوان صفحة الاستجابة بعد التشذيب
    pub response_title: String,
    /// عنوان الصفحة الأصلية بعد التشذيب
    pub original_title: &'a str,
    /// العنوان النهائي بعد التحويلات
    pub final_url: &'a Url,
    /// العنوان الذي أُرسل إليه النموذج
    pub requested_url: &'a Url,
}

impl<'a> Evidence<'a> {
    fn collect(response: &'a ProbeResponse, original_title: &'a str, requested_url: &'a Url) -> Self {
        Self {
            body_lower: response.body.to_lowercase(),
            response_title: extract_title(&response.body),
            original_title,
            final_url: &response.final_url,
            requested_url,
        }
    }
}

/// قاعدة واحدة: تعيد حكمًا إن طابقت
pub type Rule = fn(&Evidence<'_>) -> Option<Verdict>;

/// القواعد بترتيب الأولوية
pub const RULES: &[(&str, Rule)] = &[
    ("failure-phrase", failure_phrase),
    ("success-phrase", success_phrase),
    ("title-changed", title_changed),
    ("redirected", redirected),
];

fn failure_phrase(evidence: &Evidence<'_>) -> Option<Verdict> {
    FAILURE_PHRASES
        .iter()
        .any(|phrase| evidence.body_lower.contains(phrase))
        .then_some(Verdict::Failure)
}

fn success_phrase(evidence: &Evidence<'_>) -> Option<Verdict> {
    SUCCESS_PHRASES
        .iter()
        .any(|phrase| evidence.body_lower.contains(phrase))
        .then_some(Verdict::Success)
}

fn title_changed(evidence: &Evidence<'_>) -> Option<Verdict> {
    let original = evidence.original_title;
    let current = evidence.response_title.as_str();

    (!original.is_empty() && !current.is_empty() && original != current).then_some(Verdict::Success)
}

fn redirected(evidence: &Evidence<'_>) -> Option<Verdict> {
    (evidence.final_url != evidence.requested_url).then_some(Verdict::Success)
}

/// استخراج نص عنصر `<title>` بعد التشذيب (فارغ إن لم يوجد)
pub fn extract_title(html: &str) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    let document = Html::parse_document(html);
    let title: String = document
        .select(&selector)
        .flat_map(|element| element.text())
        .collect();

    title.trim().to_string()
}

/// مصنف مرتبط بصفحة أصلية واحدة (يُحسب عنوانها مرة واحدة)
#[derive(Debug, Clone)]
pub struct SuccessClassifier {
    original_title: String,
}

impl SuccessClassifier {
    /// إنشاء مصنف من نص الصفحة الأصلية قبل أي محاولة
    pub fn new(original_page: &str) -> Self {
        Self {
            original_title: extract_title(original_page),
        }
    }

    /// عنوان الصفحة الأصلية
    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    /// تصنيف استجابة واحدة
    pub fn classify(&self, response: &ProbeResponse, requested_url: &Url) -> Verdict {
        let evidence = Evidence::collect(response, &self.original_title, requested_url);

        for (name, rule) in RULES {
            if let Some(verdict) = rule(&evidence) {
                log::trace!("القاعدة {name} حسمت النتيجة: {verdict:?}");
                return verdict;
            }
        }

        Verdict::Failure
    }
}

/// تصنيف دون الاحتفاظ بمصنف
pub fn classify(response: &ProbeResponse, original_page: &str, requested_url: &Url) -> Verdict {
    SuccessClassifier::new(original_page).classify(response, requested_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = "<html><head><title> Login </title></head><body><form></form></body></html>";

    fn action() -> Url {
        Url::parse("http://target.local/login").unwrap()
    }

    fn response(body: &str) -> ProbeResponse {
        ProbeResponse::ok(action(), body)
    }

    #[test]
    fn test_failure_phrase_beats_success_phrase() {
        let body = "<title>Login</title>Welcome! Invalid username or password. <a>Logout</a>";

        assert_eq!(classify(&response(body), LOGIN_PAGE, &action()), Verdict::Failure);
    }

    #[test]
    fn test_failure_phrase_beats_title_and_redirect() {
        let mut resp = response("<title>Error</title>Authentication FAILED");
        resp.final_url = Url::parse("http://target.local/error").unwrap();

        assert_eq!(classify(&resp, LOGIN_PAGE, &action()), Verdict::Failure);
    }

    #[test]
    fn test_success_phrase_case_insensitive() {
        let body = "<title>Login</title><a href='/out'>Sign Out</a>";

        assert_eq!(classify(&response(body), LOGIN_PAGE, &action()), Verdict::Success);
    }

    #[test]
    fn test_changed_title_is_success() {
        let body = "<html><head><title>Control Panel</title></head><body>hello</body></html>";

        assert_eq!(classify(&response(body), LOGIN_PAGE, &action()), Verdict::Success);
    }

    #[test]
    fn test_title_compared_after_trimming() {
        let body = "<title>\n   Login\n</title><p>try again</p>";

        assert_eq!(classify(&response(body), LOGIN_PAGE, &action()), Verdict::Failure);
    }

    #[test]
    fn test_missing_title_does_not_count_as_change() {
        let no_title = "<p>try again</p>";
        assert_eq!(classify(&response(no_title), LOGIN_PAGE, &action()), Verdict::Failure);

        let titled = "<title>Other</title>";
        assert_eq!(classify(&response(titled), "<p>no title</p>", &action()), Verdict::Failure);
    }

    #[test]
    fn test_redirect_with_same_title_is_success() {
        let mut resp = response("<title>Login</title><p>hello</p>");
        resp.final_url = Url::parse("http://target.local/home").unwrap();

        assert_eq!(classify(&resp, LOGIN_PAGE, &action()), Verdict::Success);
    }

    #[test]
    fn test_nothing_changed_is_failure() {
        let body = "<title>Login</title><form><input name='user'></form>";

        assert_eq!(classify(&response(body), LOGIN_PAGE, &action()), Verdict::Failure);
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title(LOGIN_PAGE), "Login");
        assert_eq!(extract_title("<p>none</p>"), "");
        assert_eq!(extract_title("not even html"), "");
    }

    #[test]
    fn test_classifier_caches_original_title() {
        let classifier = SuccessClassifier::new(LOGIN_PAGE);

        assert_eq!(classifier.original_title(), "Login");
        assert!(classifier
            .classify(&response("<title>Inbox</title>"), &action())
            .is_success());
    }

    #[test]
    fn test_rules_order() {
        let names: Vec<_> = RULES.iter().map(|(name, _)| *name).collect();

        assert_eq!(
            names,
            ["failure-phrase", "success-phrase", "title-changed", "redirected"]
        );
    }
}

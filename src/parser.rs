//! محلل المدخلات
//! يحمّل قوائم المستخدمين وكلمات المرور من ملف أو من نص مباشر

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs as tokio_fs;

/// مجلدات قوائم الكلمات الشائعة
const WORDLIST_DIRS: &[&str] = &[
    "/usr/share/wordlists",
    "/usr/share/seclists",
    "/usr/share/redfox/wordlists",
];

/// تحليل الإدخال (ملف أو نص)
///
/// مسار ملف موجود يُقرأ كقائمة كلمات، نص بفواصل يُقسم، وأي شيء آخر قيمة واحدة.
/// قيمة تشبه مسار ملف (امتداد قائمة كلمات أو فاصل مسار) دون ملف موجود خطأ.
pub async fn parse_input(input: &str) -> Result<Vec<String>> {
    if let Some(path) = locate_file(input) {
        return parse_file(&path).await;
    }

    if input.contains(',') {
        Ok(parse_comma_separated(input))
    } else if looks_like_path(input) {
        Err(anyhow::anyhow!("ملف قائمة الكلمات غير موجود: {input}"))
    } else {
        let value = input.trim();
        if value.is_empty() {
            return Err(anyhow::anyhow!("قيمة فارغة"));
        }
        Ok(vec![value.to_string()])
    }
}

/// امتدادات ملفات قوائم الكلمات
const WORDLIST_EXTENSIONS: &[&str] = &["txt", "lst", "list", "dic", "dict", "wordlist"];

/// هل القيمة مسار ملف لا قيمة حرفية؟
fn looks_like_path(input: &str) -> bool {
    let input = input.trim();
    if input.contains('/') || input.contains('\\') {
        return true;
    }

    Path::new(input)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORDLIST_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// البحث عن الملف في المسار المعطى ثم في المجلدات الشائعة
fn locate_file(input: &str) -> Option<PathBuf> {
    let direct = Path::new(input);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }

    // المسارات المطلقة لا يُبحث عنها في مكان آخر
    if direct.is_absolute() {
        return None;
    }

    WORDLIST_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(input))
        .find(|candidate| candidate.is_file())
}

/// قراءة ملف قائمة كلمات
pub async fn parse_file(filepath: &Path) -> Result<Vec<String>> {
    let content = tokio_fs::read_to_string(filepath)
        .await
        .with_context(|| format!("فشل في قراءة الملف: {}", filepath.display()))?;

    let items = parse_wordlist(&content);

    if items.is_empty() {
        return Err(anyhow::anyhow!("الملف فارغ: {}", filepath.display()));
    }

    Ok(items)
}

/// أسطر مشذبة غير فارغة وليست تعليقات
pub fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// تحليل نص مفصول بفواصل
fn parse_comma_separated(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

//! أدوات مساعدة

pub mod logger;

use super::*;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests in this module that touch process env.
fn env_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// # Safety
/// Caller must hold [`env_guard`].
unsafe fn clear_llm_env() {
    unsafe {
        std::env::remove_var("LLM_API_KEY_ENV");
        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_BASE_URL");
        std::env::remove_var("LLM_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("LLM_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("TEST_KEY");
    }
}

#[test]
fn from_env_defaults_to_gemini_flash() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("GEMINI_API_KEY", "secret");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "secret");
    assert_eq!(cfg.model, DEFAULT_MODEL);
    assert_eq!(cfg.base_url, DEFAULT_GEMINI_BASE_URL);
    assert_eq!(cfg.timeouts, LlmTimeouts::default());

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_parses_overrides() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_API_KEY_ENV", "TEST_KEY");
        std::env::set_var("TEST_KEY", "k-test");
        std::env::set_var("LLM_MODEL", "gemini-1.5-pro");
        std::env::set_var("LLM_BASE_URL", "https://example.test/v1beta/");
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("LLM_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "k-test");
    assert_eq!(cfg.model, "gemini-1.5-pro");
    assert_eq!(cfg.base_url, "https://example.test/v1beta");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_missing_key_errors() {
    let _env = env_guard();
    unsafe { clear_llm_env() };

    let err = LlmConfig::from_env().unwrap_err();
    assert!(matches!(&err, LlmError::MissingApiKey { var } if var == "GEMINI_API_KEY"));
}

#[test]
fn from_env_blank_key_errors() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("GEMINI_API_KEY", "   ");
    }

    assert!(matches!(LlmConfig::from_env(), Err(LlmError::MissingApiKey { .. })));

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_bad_timeout_falls_back_to_default() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("GEMINI_API_KEY", "secret");
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "soon");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_LLM_REQUEST_TIMEOUT_SECS);

    unsafe { clear_llm_env() };
}

//! [`llm_client::mask_token`]: keys are logged as first 7 chars + `***` + last 4 chars.

use llm_client::mask_token;

/// **Test: keys of 11 chars or fewer are fully masked.**
#[test]
fn mask_token_short_keys_hide_everything() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("ollama"), "***");
    assert_eq!(mask_token("sk-proj-12"), "***");
}

/// **Test: provider keys show head and tail only.**
#[test]
fn mask_token_provider_keys() {
    assert_eq!(mask_token("sk-proj-abcdefghijklmnop"), "sk-proj***mnop");
    assert_eq!(mask_token("sk-d8f3a1b2c3d4e5f6"), "sk-d8f3***e5f6");
}

/// **Test: masking counts characters, so non-ASCII keys never split a code point.**
#[test]
fn mask_token_counts_chars_not_bytes() {
    let masked = mask_token("密钥密钥密钥密钥密钥密钥");
    assert_eq!(masked, "密钥密钥密钥密***密钥密钥");
}

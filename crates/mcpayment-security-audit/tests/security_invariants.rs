//! Security invariant tests for the mcpayment SDK.
//!
//! These tests verify that critical security properties hold across the
//! source tree. They run on every `cargo test --workspace` invocation, so a
//! later change cannot quietly regress them.

use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// Read all .rs source files from production crates (excluding tests and this crate).
fn production_source_files() -> Vec<(String, String)> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap();

    let crates_dir = root.join("crates");
    let mut files = Vec::new();

    for entry in WalkDir::new(&crates_dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }

        let path_str = path.to_str().unwrap_or("");
        if path_str.contains("security-audit") {
            continue;
        }
        if path_str.contains("tests/") || path_str.contains("\\tests\\") {
            continue;
        }

        if let Ok(content) = std::fs::read_to_string(path) {
            files.push((path_str.to_string(), content));
        }
    }

    files
}

/// Filter to only lines outside of `#[cfg(test)]` modules and `mod tests` blocks.
/// Heuristic: drops everything after `#[cfg(test)]` in a file.
fn production_lines(content: &str) -> String {
    let mut result = Vec::new();
    let mut in_test_module = false;

    for line in content.lines() {
        if line.contains("#[cfg(test)]") || line.trim().starts_with("mod tests") {
            in_test_module = true;
        }
        if !in_test_module {
            result.push(line);
        }
    }

    result.join("\n")
}

/// Body of `fn name` up to the next top-level item.
fn function_body<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let start = content.find(&format!("fn {name}"))?;
    let rest = &content[start..];
    let end = ["\nfn ", "\npub fn ", "\n#[cfg(test)]"]
        .iter()
        .filter_map(|marker| rest[1..].find(marker))
        .min()
        .map(|i| i + 1)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

#[test]
fn sources_are_found() {
    let files = production_source_files();
    assert!(
        files.iter().any(|(p, _)| p.ends_with("gateway.rs")),
        "security audit did not find the SDK sources"
    );
}

#[test]
fn no_hardcoded_secrets_in_production_code() {
    // 64 hex chars is the shape of an HMAC-SHA256 signature or a generated sign key
    let hex_64_re = Regex::new(r#""[a-fA-F0-9]{64}""#).unwrap();
    let key_assign_re = Regex::new(r#"(?i)sign_key\s*[:=]\s*"[^"]+""#).unwrap();

    for (path, content) in &production_source_files() {
        let prod_content = production_lines(content);

        if let Some(mat) = hex_64_re.find(&prod_content) {
            let line_num = prod_content[..mat.start()].lines().count() + 1;
            panic!("Potential hardcoded signature or key at {path}:{line_num}");
        }
        assert!(
            !key_assign_re.is_match(&prod_content),
            "Sign key literal assigned in production code at {path}"
        );
    }
}

#[test]
fn hmac_verify_has_no_early_returns() {
    for (path, content) in &production_source_files() {
        if !path.ends_with("hmac.rs") {
            continue;
        }

        let func = function_body(content, "verify_hmac")
            .unwrap_or_else(|| panic!("verify_hmac not found in {path}"));

        // A malformed hex signature must not short-circuit before the MAC comparison
        assert!(
            !func.contains("return false") && !func.contains("return Err"),
            "verify_hmac at {path} may have timing-leaking early returns"
        );
        assert!(
            func.contains("verify_slice"),
            "verify_hmac at {path} must use the constant-time verify_slice"
        );
    }
}

#[test]
fn callback_signature_goes_through_verify_hmac() {
    for (path, content) in &production_source_files() {
        if !path.ends_with("callback.rs") {
            continue;
        }

        let func = function_body(content, "validate_sign_key")
            .unwrap_or_else(|| panic!("validate_sign_key not found in {path}"));

        assert!(
            func.contains("verify_hmac("),
            "validate_sign_key at {path} must check the signature with verify_hmac"
        );
        assert!(
            !func.contains("==") && !func.contains(".eq("),
            "validate_sign_key at {path} must not compare signatures with == / eq"
        );
    }
}

#[test]
fn http_clients_disable_redirects() {
    let builder_re = Regex::new(r"reqwest::Client::builder\(\)").unwrap();
    let redirect_re = Regex::new(r"redirect\s*\(\s*.*Policy::none\(\)").unwrap();

    for (path, content) in &production_source_files() {
        let prod_content = production_lines(content);

        for mat in builder_re.find_iter(&prod_content) {
            let search_end = (mat.end() + 500).min(prod_content.len());
            let builder_chain = &prod_content[mat.start()..search_end];

            assert!(
                redirect_re.is_match(builder_chain),
                "reqwest::Client::builder() at {path} does not set redirect(Policy::none()). \
                 A redirect would resend the signed request to another host."
            );
        }
    }
}

#[test]
fn config_debug_redacts_sign_key() {
    for (path, content) in &production_source_files() {
        if !path.ends_with("config.rs") {
            continue;
        }
        let prod_content = production_lines(content);

        assert!(
            !prod_content.contains("#[derive(Debug, Clone)]\npub struct Config"),
            "Config at {path} derives Debug and would print the sign key"
        );
        assert!(
            prod_content.contains("[REDACTED]"),
            "Config at {path} must redact the sign key in Debug output"
        );
    }
}

#[test]
fn validation_precedes_network_calls() {
    for (path, content) in &production_source_files() {
        if !path.ends_with("gateway.rs") {
            continue;
        }

        for op in ["create", "get", "update", "transition"] {
            let func = function_body(content, op)
                .unwrap_or_else(|| panic!("fn {op} not found in {path}"));
            let validate = func
                .find("validation::")
                .unwrap_or_else(|| panic!("fn {op} in {path} does not validate its input"));
            let call = func
                .find("self.call(")
                .unwrap_or_else(|| panic!("fn {op} in {path} does not call the transport"));
            assert!(
                validate < call,
                "fn {op} in {path} must validate before calling the transport"
            );
        }
    }
}

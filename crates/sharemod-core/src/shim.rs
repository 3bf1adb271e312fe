//! Shim source templates.
//!
//! A shim is the small CommonJS module body served in place of a shared
//! module. The provider variant publishes the real library on the runtime
//! global namespace; the consumer variant reads it back. Both touch the
//! same two lookup paths (`window` and `globalThis`) under the exact
//! global name, which is the whole provider/consumer contract.

/// Generate the provider-side shim for a shared module.
///
/// The emitted script requires the real module, binds it to the global
/// name on `window` and `globalThis` only if neither already holds a
/// value (an earlier provider script wins), logs the global for
/// load-order debugging, and re-exports the instance.
pub fn provider_shim(module_id: &str, global_name: &str) -> String {
    format!(
        r#"
  const {global} = require("{module}");
  if (!window.{global} && !globalThis["{global}"]) {{
    window["{global}"] = globalThis["{global}"] = {global};
  }}
  console.log("window.{global}", window["{global}"])
  module.exports = {global};
"#,
        module = module_id,
        global = global_name,
    )
}

/// Generate the consumer-side shim for a shared module.
///
/// Re-exports whatever currently sits at the global name. The real module
/// is never imported here; if no provider script ran first the export is
/// `undefined`, which surfaces in the consuming application at runtime,
/// not at build time. The log line exists to debug exactly that.
pub fn consumer_shim(global_name: &str) -> String {
    format!(
        r#"
  console.log("window.{global}", window["{global}"])
  module.exports = window["{global}"];
"#,
        global = global_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_provider_shim_full_source() {
        let shim = provider_shim("react", "React");
        let expected = indoc! {r#"

              const React = require("react");
              if (!window.React && !globalThis["React"]) {
                window["React"] = globalThis["React"] = React;
              }
              console.log("window.React", window["React"])
              module.exports = React;
        "#};
        // Same lines, ignoring the template's leading indentation
        let got: Vec<&str> = shim.lines().map(str::trim).collect();
        let want: Vec<&str> = expected.lines().map(str::trim).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_provider_shim_requires_real_module() {
        let shim = provider_shim("react-dom/client", "ReactDOM");
        assert!(shim.contains(r#"require("react-dom/client")"#));
        assert!(shim.contains("module.exports = ReactDOM;"));
    }

    #[test]
    fn test_provider_shim_writes_both_global_paths() {
        let shim = provider_shim("react", "React");
        assert!(shim.contains(r#"window["React"] = globalThis["React"] = React;"#));
        // Write-once-if-absent: guarded on both lookup paths
        assert!(shim.contains(r#"if (!window.React && !globalThis["React"])"#));
    }

    #[test]
    fn test_consumer_shim_reads_global_only() {
        let shim = consumer_shim("React");
        assert!(shim.contains(r#"module.exports = window["React"];"#));
        assert!(!shim.contains("require("));
    }

    #[test]
    fn test_both_shims_log_the_global() {
        for shim in [provider_shim("react", "React"), consumer_shim("React")] {
            assert!(shim.contains(r#"console.log("window.React", window["React"])"#));
        }
    }
}

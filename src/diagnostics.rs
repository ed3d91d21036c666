// ABOUTME: Non-fatal findings recorded while a promotion runs.
// ABOUTME: Reported to the operator after the run, whether it succeeded or not.

use std::fmt;

/// Findings that leave a promotion successful but deserve a look.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record `warning` and log it with its kind as a field.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn contains(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The configured origin matched nothing, so the configuration was
    /// submitted unchanged.
    pub fn origin_not_found(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::OriginNotFound,
            message: message.into(),
        }
    }

    /// The triggering ref carries no environment, so nothing was promoted.
    pub fn malformed_ref(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MalformedRef,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    OriginNotFound,
    MalformedRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_run_has_no_findings() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(!diag.contains(WarningKind::OriginNotFound));
    }

    #[test]
    fn findings_keep_their_order_and_kind() {
        let mut diag = Diagnostics::default();
        diag.warn(Warning::malformed_ref("malformed ref 'main'"));
        diag.warn(Warning::origin_not_found("origin O9 not found in distribution DIST1"));

        let kinds: Vec<_> = diag.warnings().iter().map(|w| w.kind).collect();
        assert_eq!(kinds, [WarningKind::MalformedRef, WarningKind::OriginNotFound]);
        assert!(diag.contains(WarningKind::OriginNotFound));
        assert_eq!(diag.warnings()[1].to_string(), "origin O9 not found in distribution DIST1");
    }
}

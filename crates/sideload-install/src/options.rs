//! Install configuration.

use std::fmt;
use std::sync::Arc;

use sideload_progress::Progress;

/// Configuration for a single install invocation.
///
/// Every flag is independently optional and defaults to the conservative
/// value; observers are plain callbacks invoked inline from the pipeline
/// and must not block.
///
/// # Examples
///
/// ```
/// use sideload_install::InstallOptions;
///
/// let options = InstallOptions::default()
///     .bypass_version_check(true)
///     .allow_downgrade(false);
/// ```
#[derive(Clone, Default)]
pub struct InstallOptions {
    /// Bypass the target's minimum-version safety check.
    ///
    /// Default: false
    pub bypass_version_check: bool,

    /// Permit installing an older build over a newer one.
    ///
    /// Default: false
    pub allow_downgrade: bool,

    /// Replace an already-installed package of the same name.
    ///
    /// Default: false
    pub replace_existing: bool,

    /// Progress observer, invoked on every derived [`Progress`] value:
    /// once per forwarded payload chunk and once on completion.
    ///
    /// Default: None
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,

    /// Log observer, invoked for each decoded log fragment as it arrives.
    ///
    /// Default: None
    pub on_log: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl fmt::Debug for InstallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallOptions")
            .field("bypass_version_check", &self.bypass_version_check)
            .field("allow_downgrade", &self.allow_downgrade)
            .field("replace_existing", &self.replace_existing)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .field("on_log", &self.on_log.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl InstallOptions {
    /// Set whether the target's minimum-version check is bypassed.
    #[must_use]
    pub fn bypass_version_check(mut self, bypass: bool) -> Self {
        self.bypass_version_check = bypass;
        self
    }

    /// Set whether downgrades are permitted.
    #[must_use]
    pub fn allow_downgrade(mut self, allow: bool) -> Self {
        self.allow_downgrade = allow;
        self
    }

    /// Set whether an existing install of the same package is replaced.
    #[must_use]
    pub fn replace_existing(mut self, replace: bool) -> Self {
        self.replace_existing = replace;
        self
    }

    /// Set the progress observer.
    #[must_use]
    pub fn on_progress(mut self, on_progress: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Set the log observer.
    #[must_use]
    pub fn on_log(mut self, on_log: Arc<dyn Fn(&str) + Send + Sync>) -> Self {
        self.on_log = Some(on_log);
        self
    }
}

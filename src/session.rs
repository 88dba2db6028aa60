use std::{ffi::OsStr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use headless_chrome::{browser::default_executable, Browser, LaunchOptions, Tab};
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::config::AutofillConfig;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// One live Chrome process bound to the configured persistent profile.
/// Scoped to a single fill invocation: the process is killed on drop, so a
/// session can never outlive its caller and leave the profile locked.
pub struct BrowserSession {
    browser: Browser,
}

impl BrowserSession {
    /// Launch real Chrome against the persistent profile. Failure here
    /// (missing executable, profile locked by a running Chrome) is fatal for
    /// the invocation — there is no automation without a browser.
    pub fn launch(config: &AutofillConfig) -> Result<Self> {
        let executable = match &config.chrome_executable {
            Some(path) => path.clone(),
            None => default_executable().map_err(|e| anyhow!(e))?,
        };

        let profile_arg = format!("--profile-directory={}", config.profile_name);
        let args: Vec<&OsStr> = vec![
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(profile_arg.as_str()),
        ];

        let options = LaunchOptions::default_builder()
            .path(Some(executable))
            .headless(config.headless)
            .window_size(Some((1920, 1080)))
            .user_data_dir(config.user_data_dir.clone())
            .args(args)
            .idle_browser_timeout(Duration::from_millis(config.navigation_timeout_ms))
            .sandbox(true)
            .build()
            .map_err(|e| anyhow!("invalid launch options: {}", e))?;

        let browser = Browser::new(options)
            .context("could not launch browser (executable missing or profile in use?)")?;

        Ok(BrowserSession { browser })
    }

    /// Open a tab with the fixed identity policy applied: realistic desktop
    /// user agent, en-US, and the configured navigation timeout.
    pub fn open_tab(&self, config: &AutofillConfig) -> Result<Arc<Tab>> {
        let tab = self.browser.new_tab().context("could not create new tab")?;
        tab.set_default_timeout(Duration::from_millis(config.navigation_timeout_ms));
        tab.set_user_agent(USER_AGENT, Some("en-US,en;q=0.9"), Some("MacIntel"))
            .context("could not set user agent")?;
        Ok(tab)
    }

    fn kill(&self) -> bool {
        let pid = match self.browser.get_process_id() {
            Some(pid) => pid,
            None => return false,
        };
        let s = System::new();
        if let Some(process) = s.process(Pid::from_u32(pid)) {
            debug!("killing browser process with id {}", pid);
            process.kill();
            return true;
        }
        false
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("tearing down browser session...");
        self.kill();
    }
}

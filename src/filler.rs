use std::{fs, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::protocol::cdp::DOM;
use headless_chrome::{Element, Tab};
use serde_json::json;
use tokio::task;

use crate::{
    config::AutofillConfig,
    detector,
    events::EventLog,
    registry::{Vendor, VendorSignature},
    resolver::{self, ApplicantFields, FillValue, PlannedFill},
    session::BrowserSession,
    types::{AutofillError, FieldOutcome, FillAttempt, FillResult},
    utils::{artifact_path, settle_pause},
};

// how long to wait for any single selector candidate to resolve
const SELECTOR_TIMEOUT_MS: u64 = 5_000;

/// Orchestrates one form fill end to end: navigate, detect, resolve, fill
/// field by field, screenshot, tear down. Per-field failures are data, not
/// errors — only a failed launch or navigation aborts the whole operation,
/// and even those come back as a single-error `FillResult`.
pub struct FormFiller {
    config: AutofillConfig,
    events: EventLog,
}

impl FormFiller {
    pub fn new(config: AutofillConfig) -> Self {
        let events = EventLog::new(config.event_log.clone());
        FormFiller { config, events }
    }

    /// Fill the application form at `url` with the supplied fields. Never
    /// panics past its boundary and never returns an `Err`: every outcome is
    /// a `FillResult` the caller can inspect uniformly.
    pub async fn fill_and_report(&self, url: &str, fields: ApplicantFields) -> FillResult {
        let config = self.config.clone();
        let events = self.events.clone();
        let job_url = url.to_string();

        let result = task::spawn_blocking(move || Self::fill_blocking(&config, &events, &job_url, &fields))
            .await
            .unwrap_or_else(|e| FillResult::failure(format!("fill task failed: {}", e)));

        let event_type = if result.errors.is_empty() {
            "ats_form_filled"
        } else {
            "ats_form_error"
        };
        self.events.append(
            event_type,
            json!({
                "job_url": url,
                "result": serde_json::to_value(&result).unwrap_or_default(),
            }),
        );

        result
    }

    // the whole browser interaction is blocking, headless_chrome style
    fn fill_blocking(
        config: &AutofillConfig,
        events: &EventLog,
        url: &str,
        fields: &ApplicantFields,
    ) -> FillResult {
        let session = match BrowserSession::launch(config) {
            Ok(session) => session,
            Err(e) => {
                error!("browser launch failed for {}: {:#}", url, e);
                return FillResult::failure(AutofillError::BrowserLaunch(format!("{:#}", e)).to_string());
            }
        };

        let tab = match session.open_tab(config) {
            Ok(tab) => tab,
            Err(e) => {
                error!("could not open tab for {}: {:#}", url, e);
                return FillResult::failure(AutofillError::BrowserLaunch(format!("{:#}", e)).to_string());
            }
        };

        if let Err(e) = Self::navigate(&tab, url, config) {
            warn!("navigation to {} failed: {:#}", url, e);
            return FillResult::failure(AutofillError::Navigation(format!("{:#}", e)).to_string());
        }

        let signature = Self::detect_vendor(&tab, events, url);
        let plan = resolver::resolve(signature, fields);
        debug!("fill plan for {} has {} fields", url, plan.len());

        let mut attempts = vec![];
        for planned in &plan {
            let attempt = Self::apply(&tab, planned);
            match &attempt.outcome {
                FieldOutcome::Filled { selector } => {
                    debug!("filled {} via {}", attempt.field, selector)
                }
                FieldOutcome::NotFound => {
                    warn!("no selector resolved for {} ({} tried)", attempt.field, attempt.tried.len())
                }
                FieldOutcome::Failed(msg) => warn!("{}", msg),
            }
            attempts.push(attempt);
        }

        let screenshot = Self::capture_screenshot(&tab, config);

        // session drops here; the Chrome process is gone before we return
        FillResult::from_attempts(&attempts, screenshot)
    }

    fn navigate(tab: &Arc<Tab>, url: &str, config: &AutofillConfig) -> Result<()> {
        tab.navigate_to(url)
            .context("could not start navigation")?
            .wait_until_navigated()
            .context("navigation timeout")?;
        settle_pause(config.min_settle_secs, config.max_settle_secs);
        Ok(())
    }

    // URL pass first; content pass only when the URL told us nothing
    fn detect_vendor(tab: &Arc<Tab>, events: &EventLog, url: &str) -> &'static VendorSignature {
        let by_url = detector::detect_from_url(url);
        let signature = if by_url.vendor != Vendor::Unknown {
            by_url
        } else {
            match tab.get_content() {
                Ok(content) => detector::detect(url, Some(&content)),
                Err(e) => {
                    warn!("could not read page content for detection: {}", e);
                    by_url
                }
            }
        };
        info!("detected ATS vendor {} for {}", signature.vendor, url);
        events.append(
            "ats_vendor_detected",
            json!({ "job_url": url, "vendor": signature.vendor }),
        );
        signature
    }

    fn apply(tab: &Arc<Tab>, planned: &PlannedFill) -> FillAttempt {
        match &planned.value {
            FillValue::Text(value) => Self::fill_text(tab, planned, value),
            FillValue::File(path) => Self::attach_file(tab, planned, path),
        }
    }

    fn fill_text(tab: &Arc<Tab>, planned: &PlannedFill, value: &str) -> FillAttempt {
        let mut tried = vec![];
        for selector in &planned.selectors {
            tried.push(selector.clone());
            let element = match tab.wait_for_element_with_custom_timeout(
                selector,
                Duration::from_millis(SELECTOR_TIMEOUT_MS),
            ) {
                Ok(element) => element,
                Err(_) => continue,
            };

            let outcome = match Self::write_value(&element, value) {
                Ok(_) => FieldOutcome::Filled {
                    selector: selector.clone(),
                },
                Err(e) => FieldOutcome::Failed(format!(
                    "error filling field {}: {}",
                    planned.field, e
                )),
            };
            return FillAttempt {
                field: planned.field,
                tried,
                outcome,
            };
        }
        FillAttempt {
            field: planned.field,
            tried,
            outcome: FieldOutcome::NotFound,
        }
    }

    // clear whatever is there, then type like a user would
    fn write_value(element: &Element, value: &str) -> Result<()> {
        element
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .context("could not clear field")?;
        element.type_into(value).context("could not type into field")?;
        Ok(())
    }

    fn attach_file(tab: &Arc<Tab>, planned: &PlannedFill, path: &PathBuf) -> FillAttempt {
        if !path.exists() {
            return FillAttempt {
                field: planned.field,
                tried: vec![],
                outcome: FieldOutcome::Failed(format!(
                    "error uploading resume: file not found at {}",
                    path.display()
                )),
            };
        }

        let mut tried = vec![];
        for selector in &planned.selectors {
            tried.push(selector.clone());
            let element = match tab.wait_for_element_with_custom_timeout(
                selector,
                Duration::from_millis(SELECTOR_TIMEOUT_MS),
            ) {
                Ok(element) => element,
                Err(_) => continue,
            };

            let outcome = match Self::set_input_files(tab, &element, path) {
                Ok(_) => FieldOutcome::Filled {
                    selector: selector.clone(),
                },
                Err(e) => FieldOutcome::Failed(format!("error uploading resume: {}", e)),
            };
            return FillAttempt {
                field: planned.field,
                tried,
                outcome,
            };
        }
        FillAttempt {
            field: planned.field,
            tried,
            outcome: FieldOutcome::NotFound,
        }
    }

    fn set_input_files(tab: &Arc<Tab>, element: &Element, path: &PathBuf) -> Result<()> {
        tab.call_method(DOM::SetFileInputFiles {
            files: vec![path.to_string_lossy().to_string()],
            node_id: None,
            backend_node_id: Some(element.backend_node_id),
            object_id: None,
        })
        .context("could not attach file to input")?;
        Ok(())
    }

    // unconditional once the page settled, even on partial failure: the
    // screenshot is the audit trail a human reviews before trusting the fill
    fn capture_screenshot(tab: &Arc<Tab>, config: &AutofillConfig) -> Option<PathBuf> {
        let png = match tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        {
            Ok(png) => png,
            Err(e) => {
                warn!("could not capture verification screenshot: {}", e);
                return None;
            }
        };
        if let Err(e) = fs::create_dir_all(&config.artifact_dir) {
            warn!("could not create artifact dir {:?}: {}", config.artifact_dir, e);
            return None;
        }
        let path = artifact_path(&config.artifact_dir);
        match fs::write(&path, png) {
            Ok(_) => {
                debug!("saved verification screenshot to {:?}", path);
                Some(path)
            }
            Err(e) => {
                warn!("could not save screenshot to {:?}: {}", path, e);
                None
            }
        }
    }
}

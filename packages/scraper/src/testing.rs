//! Scripted transport, observers, and page fixtures shared by unit tests.

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use case_lookup_case_models::{SearchOutcome, SearchStatus};

use crate::{
    Stage, TransportError,
    progress::PipelineObserver,
    transport::{PortalRequest, PortalResponse, Transport},
};

/// Lookup page carrying a CAPTCHA and anti-forgery token.
pub const LOOKUP_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<form method="POST" action="/app/case-number">
  <input type="hidden" name="_token" value="tok_0123456789abcdefghijklmnop">
  <select name="case_type"><option value="CRLMM">CRL.M.C.</option></select>
  <div class="captcha"><span id="captcha-code"> A1B2C </span></div>
  <input type="text" name="captchaInput">
</form>
</body></html>"#;

/// Results page in the judgment layout with one row.
pub const JUDGMENT_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<table id="s_judgeTable" class="table">
  <thead><tr><th>S.No.</th><th>Case No.</th><th>Judgment</th><th>Party</th></tr></thead>
  <tbody>
    <tr>
      <td>1</td>
      <td>W.P.(C)-11180/2025</td>
      <td><a href="/app/showFileJudgment/11180.pdf" target="_blank">21-07-2025</a></td>
      <td>ANIJAY TYAGI&nbsp;VS
          MUNICIPAL CORPORATION OF DELHI</td>
    </tr>
  </tbody>
</table>
</body></html>"#;

/// Results page in the case-status layout with one complete row and one
/// row missing its identifier, respondent, and listing.
pub const CASE_STATUS_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<table id="caseTable" class="table table-bordered">
  <thead>
    <tr><th>S.No.</th><th>Diary No. / Case No.[STATUS]</th><th>Petitioner Vs. Respondent</th><th>Listing Date / Court No.</th></tr>
  </thead>
  <tbody>
    <tr>
      <td>1</td>
      <td>CRL.M.C.-558/2025<br><font color="red">[DISPOSED]</font><br>
          <a href="/app/case-type-status-details/abc">Orders</a></td>
      <td>RAM KUMAR<br>VS.<br>STATE OF NCT OF DELHI</td>
      <td>NEXT DATE: 15/09/2025<br>Last Date: 10/07/2025<br>COURT NO: 12</td>
    </tr>
    <tr>
      <td>2</td>
      <td>Diary pending</td>
      <td>SOLE PARTY</td>
      <td></td>
    </tr>
  </tbody>
</table>
</body></html>"#;

/// Replays canned responses in order and records every request.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<PortalResponse, TransportError>>>,
    requests: Mutex<Vec<PortalRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<PortalResponse, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PortalRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, request: PortalRequest) -> Result<PortalResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Status(599)))
    }
}

/// Observer that remembers what it was told.
#[derive(Default)]
pub struct RecordingObserver {
    stages: Mutex<Vec<Stage>>,
    finished: Mutex<Option<SearchStatus>>,
}

impl RecordingObserver {
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Option<SearchStatus> {
        *self.finished.lock().unwrap()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_stage(&self, stage: Stage) {
        self.stages.lock().unwrap().push(stage);
    }

    fn on_finish(&self, outcome: &SearchOutcome) {
        *self.finished.lock().unwrap() = Some(outcome.status());
    }
}

// Re-export the proto module from the shared `api-shared` crate so callers
// can continue to reference `api_grpc::service::pb`.
pub use api_shared::pb;

use api_shared::pb::{
    triage_server::Triage, HealthRes, RuleBasedRes, RuleTableRes, SuggestPriorityReq,
    SuggestPriorityRes,
};
use api_shared::{ApiKey, HealthService, HistoryGate};
use std::time::Duration;
use tonic::{Request, Response, Status};
use triage_core::service::today;
use triage_core::{
    HistorySuggestion, MotiveText, RawVitalSigns, RuleSuggestion, TriageInput, TriageService,
};

/// Authentication interceptor for gRPC requests
///
/// Requires an `x-api-key` metadata entry matching the key resolved at startup.
#[derive(Clone, Debug)]
pub struct AuthInterceptor {
    key: ApiKey,
}

impl AuthInterceptor {
    pub fn new(key: ApiKey) -> Self {
        Self { key }
    }
}

impl tonic::service::Interceptor for AuthInterceptor {
    fn call(&mut self, req: Request<()>) -> Result<Request<()>, Status> {
        let api_key = req
            .metadata()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Status::unauthenticated("Missing x-api-key header"))?;

        self.key.validate(api_key)?;
        Ok(req)
    }
}

#[derive(Clone, Debug)]
pub struct TriageGrpcService {
    triage: TriageService,
    history: HistoryGate,
}

impl TriageGrpcService {
    pub fn new(triage: TriageService, history_deadline: Duration) -> Self {
        Self {
            triage,
            history: HistoryGate::new(history_deadline),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[allow(clippy::result_large_err)]
fn into_input(req: SuggestPriorityReq) -> Result<TriageInput, Status> {
    let motive = MotiveText::new(&req.motivo_accesso)
        .map_err(|e| Status::invalid_argument(format!("motivo_accesso: {}", e)))?;

    let vitals = req
        .vital_signs
        .map(|v| RawVitalSigns {
            blood_pressure: non_empty(v.blood_pressure),
            body_temperature: non_empty(v.body_temperature),
            heart_rate: non_empty(v.heart_rate),
            oxygen_saturation: non_empty(v.oxygen_saturation),
        })
        .unwrap_or_default();

    Ok(TriageInput::new(motive, req.codice_fiscale, &vitals))
}

fn rule_based_res(rules: &RuleSuggestion) -> RuleBasedRes {
    RuleBasedRes {
        code: rules.code.to_string(),
        reason: rules.reason(),
        reasons: rules.reasons.clone(),
    }
}

fn history_based_res(history: &HistorySuggestion) -> pb::HistoryBasedRes {
    pb::HistoryBasedRes {
        code: history.code.map(|c| c.to_string()),
        reason: history.reason.clone(),
        matches: u32::try_from(history.match_count).unwrap_or(u32::MAX),
    }
}

#[tonic::async_trait]
impl Triage for TriageGrpcService {
    async fn health(&self, _req: Request<()>) -> Result<Response<HealthRes>, Status> {
        Ok(Response::new(HealthService::check_health()))
    }

    async fn suggest_priority(
        &self,
        req: Request<SuggestPriorityReq>,
    ) -> Result<Response<SuggestPriorityRes>, Status> {
        let input = into_input(req.into_inner())?;
        let result = self.history.suggest(&self.triage, &input).await;

        Ok(Response::new(SuggestPriorityRes {
            code: result.code.map(|c| c.to_string()),
            rule_based: Some(rule_based_res(&result.rule_based)),
            history_based: Some(history_based_res(&result.history_based)),
            reason: result.reason,
        }))
    }

    async fn estimate_priority(
        &self,
        req: Request<SuggestPriorityReq>,
    ) -> Result<Response<RuleBasedRes>, Status> {
        let input = into_input(req.into_inner())?;
        let rules = self.triage.evaluate_rules(&input, today());
        Ok(Response::new(rule_based_res(&rules)))
    }

    async fn get_rule_table(&self, _req: Request<()>) -> Result<Response<RuleTableRes>, Status> {
        match self.triage.engine().table().to_json_pretty() {
            Ok(json) => Ok(Response::new(RuleTableRes { json })),
            Err(e) => {
                tracing::error!("Rule table export error: {:?}", e);
                Err(Status::internal("Failed to export rule table"))
            }
        }
    }
}

use scout_core::{BriefRequest, JurisdictionRepository, PolicyBrief, PolicyError};

use crate::PolicyService;

/// Caller-side recompute loop: holds the latest request and its outcome, and
/// regenerates from scratch whenever the request changes.
pub struct BriefDraft<R>
where
    R: JurisdictionRepository,
{
    service: PolicyService<R>,
    request: BriefRequest,
    outcome: Option<Result<PolicyBrief, PolicyError>>,
    recomputes: u64,
}

impl<R> BriefDraft<R>
where
    R: JurisdictionRepository,
{
    pub fn new(service: PolicyService<R>) -> Self {
        Self {
            service,
            request: BriefRequest::default(),
            outcome: None,
            recomputes: 0,
        }
    }

    pub fn request(&self) -> &BriefRequest {
        &self.request
    }

    pub fn outcome(&self) -> Option<&Result<PolicyBrief, PolicyError>> {
        self.outcome.as_ref()
    }

    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    pub fn update(&mut self, request: BriefRequest) -> &Result<PolicyBrief, PolicyError> {
        let outcome = match self.outcome.take() {
            Some(existing) if request == self.request => existing,
            _ => {
                self.recomputes += 1;
                self.service.generate(&request)
            }
        };
        self.request = request;
        self.outcome.insert(outcome)
    }

    pub fn edit<F>(&mut self, change: F) -> &Result<PolicyBrief, PolicyError>
    where
        F: FnOnce(&mut BriefRequest),
    {
        let mut next = self.request.clone();
        change(&mut next);
        self.update(next)
    }
}

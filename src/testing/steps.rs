use std::fmt::{self, Display};

use serde::Serialize;
use tracing::{debug, warn};

use super::Assertion;
use crate::error::HarnessError;
use crate::http::request::ApiRequest;
use crate::http::response::HttpResponse;
use crate::ideas::{
    CREATE_PATH, CREATED_MSG, DELETE_PATH, EDIT_PATH, EDITED_MSG, IDEA_ID_PARAM, IdeaRecord,
    IdeaRequest, LIST_PATH, NO_SUCH_IDEA_MSG,
};

/// Identifier no server is expected to know.
pub const DEFAULT_MISSING_IDEA_ID: &str = "123";

/// State threaded through the steps of one run.
///
/// `last_idea_id` is written by [`Step::ListIdeas`] and read by the edit and
/// delete steps that follow it.
#[derive(Debug, Clone)]
pub struct RunContext {
    last_idea_id: Option<String>,
    missing_idea_id: String,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            last_idea_id: None,
            missing_idea_id: DEFAULT_MISSING_IDEA_ID.to_string(),
        }
    }
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_idea_id(mut self, id: impl Into<String>) -> Self {
        self.missing_idea_id = id.into();
        self
    }

    pub fn last_idea_id(&self) -> Option<&str> {
        self.last_idea_id.as_deref()
    }

    pub fn missing_idea_id(&self) -> &str {
        &self.missing_idea_id
    }

    fn require_idea_id(&self) -> Result<&str, HarnessError> {
        self.last_idea_id().ok_or_else(|| {
            HarnessError::Precondition("no idea id captured by a previous listing step".to_string())
        })
    }
}

/// One ordered unit of request plus assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CreateIdea,
    ListIdeas,
    EditIdea,
    DeleteIdea,
    CreateInvalidIdea,
    EditMissingIdea,
    DeleteMissingIdea,
    /// Deleting the already deleted idea again must be rejected.
    DeleteDeletedIdea,
}

impl Step {
    pub const CORE: [Step; 7] = [
        Step::CreateIdea,
        Step::ListIdeas,
        Step::EditIdea,
        Step::DeleteIdea,
        Step::CreateInvalidIdea,
        Step::EditMissingIdea,
        Step::DeleteMissingIdea,
    ];

    /// The execution order. Later steps depend on state written by earlier
    /// ones, so callers must not reorder it.
    pub fn plan(extended: bool) -> Vec<Step> {
        let mut plan = Step::CORE.to_vec();
        if extended {
            plan.push(Step::DeleteDeletedIdea);
        }
        plan
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::CreateIdea => "create_idea_with_required_fields",
            Step::ListIdeas => "get_all_ideas",
            Step::EditIdea => "edit_existing_idea",
            Step::DeleteIdea => "delete_existing_idea",
            Step::CreateInvalidIdea => "create_idea_without_required_fields",
            Step::EditMissingIdea => "edit_non_existing_idea",
            Step::DeleteMissingIdea => "delete_non_existing_idea",
            Step::DeleteDeletedIdea => "delete_already_deleted_idea",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::CreateIdea => "create an idea with title and description, expect 200 and a created message",
            Step::ListIdeas => "list all ideas, expect a non-empty list and capture the last id",
            Step::EditIdea => "edit the captured idea, expect 200 and an edited message",
            Step::DeleteIdea => "delete the captured idea, expect 200",
            Step::CreateInvalidIdea => "create an idea with empty title and description, expect 400",
            Step::EditMissingIdea => "edit an unknown idea, expect 400 and a no-such-idea message",
            Step::DeleteMissingIdea => "delete an unknown idea, expect 400 and a no-such-idea message",
            Step::DeleteDeletedIdea => "delete the captured idea a second time, expect 400",
        }
    }

    /// Build the request, or fail when a consumed value has not been captured.
    pub fn request(self, ctx: &RunContext) -> Result<ApiRequest, HarnessError> {
        match self {
            Step::CreateIdea => ApiRequest::post(CREATE_PATH)
                .json(&IdeaRequest::new("Test Idea", "This is a test idea description.")),
            Step::ListIdeas => Ok(ApiRequest::get(LIST_PATH)),
            Step::EditIdea => ApiRequest::put(EDIT_PATH)
                .query(IDEA_ID_PARAM, ctx.require_idea_id()?)
                .json(&IdeaRequest::new("Edited Idea", "This is an edited idea description.")),
            Step::DeleteIdea | Step::DeleteDeletedIdea => {
                Ok(ApiRequest::delete(DELETE_PATH).query(IDEA_ID_PARAM, ctx.require_idea_id()?))
            }
            Step::CreateInvalidIdea => ApiRequest::post(CREATE_PATH).json(&IdeaRequest::new("", "")),
            Step::EditMissingIdea => ApiRequest::put(EDIT_PATH)
                .query(IDEA_ID_PARAM, ctx.missing_idea_id())
                .json(&IdeaRequest::new(
                    "Edited Non-Existing-Idea",
                    "This is updated test idea description for a non-existing idea.",
                )),
            Step::DeleteMissingIdea => {
                Ok(ApiRequest::delete(DELETE_PATH).query(IDEA_ID_PARAM, ctx.missing_idea_id()))
            }
        }
    }

    pub fn assertions(self) -> Vec<Assertion> {
        match self {
            Step::CreateIdea => vec![Assertion::status(200), Assertion::field_equals("msg", CREATED_MSG)],
            Step::ListIdeas => vec![Assertion::status(200), Assertion::json_array_not_empty()],
            Step::EditIdea => vec![Assertion::status(200), Assertion::field_equals("msg", EDITED_MSG)],
            Step::DeleteIdea => vec![Assertion::status(200)],
            Step::CreateInvalidIdea => vec![Assertion::status(400)],
            Step::EditMissingIdea | Step::DeleteMissingIdea | Step::DeleteDeletedIdea => {
                vec![Assertion::status(400), Assertion::body_contains(NO_SUCH_IDEA_MSG)]
            }
        }
    }

    /// Record values later steps consume.
    pub fn capture(self, ctx: &mut RunContext, response: &HttpResponse) {
        if self != Step::ListIdeas || !response.is_status(200) {
            return;
        }

        match response.json::<Vec<IdeaRecord>>() {
            Ok(records) => {
                if let Some(last) = records.last() {
                    if last.id.is_none() {
                        warn!("last listed idea has no id");
                    }
                    debug!(idea_id = ?last.id, "captured last idea id");
                    ctx.last_idea_id = last.id.clone();
                }
            }
            Err(err) => warn!(error = %err, "listing response is not a list of ideas"),
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

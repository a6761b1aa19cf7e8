//! Chat context assembly.
//!
//! Builds the [`SleepContext`] attached to outgoing chat requests from the
//! sleep-training program and assessment. Missing, inactive or unreadable
//! data always collapses to `{ "hasActiveProgram": false }`.

use chrono::{DateTime, Utc};
use shared::{
    ActiveProgramContext, ChatMessage, ChatRelayRequest, ChatRole, SleepAssessment, SleepContext,
    SleepTrainingProgram,
};
use tracing::{debug, warn};

use crate::storage::SleepTrainingRepository;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// 1-based night of the program; never below 1
pub fn current_night(start_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let days_since = (now - start_date).num_milliseconds().div_euclid(MILLIS_PER_DAY);
    (days_since + 1).max(1)
}

/// Pure assembly from already-loaded data
pub fn build_sleep_context(
    assessment: Option<&SleepAssessment>,
    program: Option<&SleepTrainingProgram>,
    now: DateTime<Utc>,
) -> SleepContext {
    let (assessment, program) = match (assessment, program) {
        (Some(assessment), Some(program)) if program.is_active => (assessment, program),
        _ => return SleepContext::inactive(),
    };

    SleepContext {
        has_active_program: true,
        program: Some(ActiveProgramContext {
            baby_name: assessment.baby_name.clone(),
            baby_age_months: assessment.baby_age_months,
            method_id: program.method_id.clone(),
            current_night: current_night(program.start_date, now),
            main_problems: assessment.main_problems.clone(),
            crying_tolerance: assessment.crying_tolerance.clone(),
        }),
    }
}

/// System message describing an active program, if there is one
pub fn context_system_message(context: &SleepContext) -> Option<ChatMessage> {
    let program = context.program.as_ref().filter(|_| context.has_active_program)?;

    let problems = if program.main_problems.is_empty() {
        "none listed".to_string()
    } else {
        program.main_problems.join(", ")
    };
    let content = format!(
        "Sleep training context: {} ({} months) is on night {} of the '{}' method. \
         Main problems: {}. Crying tolerance: {}.",
        program.baby_name,
        program.baby_age_months,
        program.current_night,
        program.method_id,
        problems,
        program.crying_tolerance,
    );

    Some(ChatMessage {
        role: ChatRole::System,
        content,
    })
}

/// Prepend the sleep context to the conversation, ready for the relay
pub fn prepare_chat_request(
    messages: Vec<ChatMessage>,
    context: &SleepContext,
    baby_age: Option<u8>,
) -> ChatRelayRequest {
    let mut prepared = Vec::with_capacity(messages.len() + 1);
    if let Some(system) = context_system_message(context) {
        prepared.push(system);
    }
    prepared.extend(messages);

    ChatRelayRequest {
        messages: prepared,
        baby_age,
    }
}

/// Loads the stored program and assessment and assembles the context
#[derive(Clone)]
pub struct ChatContextService {
    sleep_training_repository: SleepTrainingRepository,
}

impl ChatContextService {
    pub fn new(sleep_training_repository: SleepTrainingRepository) -> Self {
        Self { sleep_training_repository }
    }

    pub fn sleep_context(&self, now: DateTime<Utc>) -> SleepContext {
        let program = match self.sleep_training_repository.load_program() {
            Ok(program) => program,
            Err(e) => {
                warn!("Ignoring unreadable sleep training program: {:#}", e);
                return SleepContext::inactive();
            }
        };
        let assessment = match self.sleep_training_repository.load_assessment() {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!("Ignoring unreadable sleep assessment: {:#}", e);
                return SleepContext::inactive();
            }
        };

        let context = build_sleep_context(assessment.as_ref(), program.as_ref(), now);
        debug!("Assembled sleep context (active: {})", context.has_active_program);
        context
    }

    pub fn prepare_chat_request(
        &self,
        messages: Vec<ChatMessage>,
        baby_age: Option<u8>,
        now: DateTime<Utc>,
    ) -> ChatRelayRequest {
        let context = self.sleep_context(now);
        prepare_chat_request(messages, &context, baby_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::sleep_training_repository::SLEEP_ASSESSMENT_KEY;
    use crate::storage::json::test_utils::TestHelper;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 21, 0, 0).unwrap()
    }

    fn assessment() -> SleepAssessment {
        SleepAssessment {
            baby_name: "Ada".to_string(),
            baby_age_months: 7,
            main_problems: vec!["night-waking".to_string(), "short-naps".to_string()],
            crying_tolerance: "medium".to_string(),
        }
    }

    fn program(start_date: DateTime<Utc>, is_active: bool) -> SleepTrainingProgram {
        SleepTrainingProgram {
            method_id: "ferber".to_string(),
            start_date,
            is_active,
        }
    }

    #[test]
    fn test_current_night() {
        assert_eq!(current_night(now() - Duration::days(3), now()), 4);
        assert_eq!(current_night(now(), now()), 1);
        assert_eq!(current_night(now() - Duration::hours(23), now()), 1);
        assert_eq!(current_night(now() + Duration::days(2), now()), 1);
    }

    #[test]
    fn test_no_program_is_inactive() {
        let context = build_sleep_context(Some(&assessment()), None, now());
        assert_eq!(context, SleepContext::inactive());
        assert_eq!(
            serde_json::to_value(&context).unwrap(),
            serde_json::json!({ "hasActiveProgram": false })
        );
    }

    #[test]
    fn test_inactive_program_is_inactive() {
        let program = program(now() - Duration::days(3), false);
        let context = build_sleep_context(Some(&assessment()), Some(&program), now());
        assert_eq!(context, SleepContext::inactive());
    }

    #[test]
    fn test_missing_assessment_is_inactive() {
        let program = program(now() - Duration::days(3), true);
        assert_eq!(build_sleep_context(None, Some(&program), now()), SleepContext::inactive());
    }

    #[test]
    fn test_active_program_packages_fields_verbatim() {
        let program = program(now() - Duration::days(3), true);
        let context = build_sleep_context(Some(&assessment()), Some(&program), now());

        assert!(context.has_active_program);
        let details = context.program.unwrap();
        assert_eq!(details.current_night, 4);
        assert_eq!(details.method_id, "ferber");
        assert_eq!(details.baby_name, "Ada");
        assert_eq!(details.main_problems, assessment().main_problems);
        assert_eq!(details.crying_tolerance, "medium");
    }

    #[test]
    fn test_prepare_chat_request_prepends_context() {
        let program = program(now() - Duration::days(1), true);
        let context = build_sleep_context(Some(&assessment()), Some(&program), now());
        let user = ChatMessage {
            role: ChatRole::User,
            content: "She woke at 2am again".to_string(),
        };

        let request = prepare_chat_request(vec![user.clone()], &context, Some(7));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert!(request.messages[0].content.contains("night 2"));
        assert_eq!(request.messages[1], user);
        assert_eq!(request.baby_age, Some(7));

        let plain = prepare_chat_request(vec![user.clone()], &SleepContext::inactive(), None);
        assert_eq!(plain.messages, vec![user]);
    }

    #[test]
    fn test_service_fails_soft_on_malformed_storage() {
        let helper = TestHelper::new().unwrap();
        helper
            .sleep_training_repo
            .save_program(&program(now() - Duration::days(3), true))
            .unwrap();
        helper.write_raw(SLEEP_ASSESSMENT_KEY, "{broken").unwrap();

        let service = ChatContextService::new(helper.sleep_training_repo.clone());
        assert_eq!(service.sleep_context(now()), SleepContext::inactive());
    }

    #[test]
    fn test_service_reads_active_program() {
        let helper = TestHelper::new().unwrap();
        helper
            .sleep_training_repo
            .save_program(&program(now() - Duration::days(3), true))
            .unwrap();
        helper.sleep_training_repo.save_assessment(&assessment()).unwrap();

        let service = ChatContextService::new(helper.sleep_training_repo.clone());
        let context = service.sleep_context(now());
        assert_eq!(context.program.unwrap().current_night, 4);
    }
}

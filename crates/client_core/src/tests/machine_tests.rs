use super::*;

fn step(id: StepId, required_action: &str) -> Step {
    Step {
        id,
        description: format!("{id} step"),
        required_action: ActionId::from(required_action),
    }
}

fn scenario() -> Scenario {
    Scenario {
        title: "Acid-Base Titration".to_string(),
        description: "Titrate an unknown base.".to_string(),
        first_step: step(StepId::Start, ActionId::WEAR_PPE),
        total_steps: 5,
    }
}

fn correct(next: Option<Step>, complete: bool) -> Option<ActionResult> {
    Some(ActionResult::Correct {
        message: "Good work!".to_string(),
        complete,
        next_step: next,
    })
}

fn incorrect() -> Option<ActionResult> {
    Some(ActionResult::Incorrect {
        consequence: "You spilled acid.".to_string(),
        hint: Some("Always wear gloves.".to_string()),
        hint_reason: None,
        severity: Severity::Mistake,
    })
}

/// Machine that has loaded the scenario and entered the bench.
fn machine_in_lab() -> LabMachine {
    let mut machine = LabMachine::new();
    assert_eq!(machine.boot(), vec![Effect::FetchScenario]);
    assert!(machine.handle(LabEvent::ScenarioLoaded(Some(scenario()))).is_empty());
    assert!(machine.handle(LabEvent::Start).is_empty());
    assert_eq!(machine.phase(), Phase::Lab);
    machine
}

fn submit(machine: &mut LabMachine, action: &str) -> (Generation, StepId) {
    let effects = machine.handle(LabEvent::Action(ActionId::from(action)));
    match effects.as_slice() {
        [Effect::SubmitAction {
            generation, step, ..
        }] => (*generation, *step),
        other => panic!("expected one submit effect, got {other:?}"),
    }
}

#[test]
fn scenario_load_sets_first_step() {
    let mut machine = LabMachine::new();
    machine.handle(LabEvent::ScenarioLoaded(Some(scenario())));

    assert_eq!(machine.phase(), Phase::Intro);
    assert_eq!(machine.current_step().map(|s| s.id), Some(StepId::Start));
}

#[test]
fn failed_scenario_load_changes_nothing() {
    let mut machine = LabMachine::new();
    assert!(machine.handle(LabEvent::ScenarioLoaded(None)).is_empty());
    assert!(machine.scenario().is_none());
    assert!(machine.current_step().is_none());
}

#[test]
fn start_without_scenario_refetches_and_stays_in_intro() {
    let mut machine = LabMachine::new();
    assert_eq!(machine.handle(LabEvent::Start), vec![Effect::FetchScenario]);
    assert_eq!(machine.phase(), Phase::Intro);
}

#[test]
fn action_before_scenario_is_noop() {
    let mut machine = LabMachine::new();
    assert!(machine
        .handle(LabEvent::Action(ActionId::from(ActionId::WEAR_PPE)))
        .is_empty());
}

#[test]
fn action_outside_lab_phase_is_noop() {
    let mut machine = LabMachine::new();
    machine.handle(LabEvent::ScenarioLoaded(Some(scenario())));
    assert!(machine
        .handle(LabEvent::Action(ActionId::from(ActionId::WEAR_PPE)))
        .is_empty());
}

#[test]
fn correct_incomplete_verdict_advances_exactly_one_step() {
    let mut machine = machine_in_lab();
    let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);
    assert_eq!(step_id, StepId::Start);

    let next = step(StepId::FillBurette, ActionId::FILL_BURETTE_HCL);
    let effects = machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: correct(Some(next.clone()), false),
    });

    assert_eq!(machine.current_step(), Some(&next));
    assert_eq!(machine.completed(), 1);
    let feedback = machine.feedback().expect("feedback");
    assert!(feedback.is_correct());
    assert_eq!(
        effects,
        vec![Effect::ClearFeedbackAfter {
            token: feedback.token,
            delay: SUCCESS_FEEDBACK_TTL,
        }]
    );
}

#[test]
fn incorrect_verdict_keeps_step_and_count() {
    let mut machine = machine_in_lab();
    let (generation, step_id) = submit(&mut machine, ActionId::SKIP_PPE);

    let effects = machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: incorrect(),
    });

    assert!(effects.is_empty(), "failure feedback must not arm a timer");
    assert_eq!(machine.current_step().map(|s| s.id), Some(StepId::Start));
    assert_eq!(machine.completed(), 0);
    let feedback = machine.feedback().expect("feedback");
    assert!(!feedback.auto_dismisses());
    assert_eq!(feedback.severity(), Severity::Mistake);
}

#[test]
fn network_failure_leaves_state_untouched() {
    let mut machine = machine_in_lab();
    let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);

    assert!(machine
        .handle(LabEvent::Verdict {
            generation,
            step: step_id,
            result: None,
        })
        .is_empty());
    assert_eq!(machine.phase(), Phase::Lab);
    assert_eq!(machine.current_step().map(|s| s.id), Some(StepId::Start));
    assert!(machine.feedback().is_none());

    // The learner can click again once the failed call has resolved.
    submit(&mut machine, ActionId::WEAR_PPE);
}

#[test]
fn second_click_while_verdict_pending_is_ignored() {
    let mut machine = machine_in_lab();
    submit(&mut machine, ActionId::WEAR_PPE);
    assert!(machine
        .handle(LabEvent::Action(ActionId::from(ActionId::SKIP_PPE)))
        .is_empty());
}

#[test]
fn expired_timer_only_clears_its_own_feedback() {
    let mut machine = machine_in_lab();
    let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);
    machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: correct(Some(step(StepId::FillBurette, ActionId::FILL_BURETTE_HCL)), false),
    });
    let success_token = machine.feedback().expect("success").token;

    let (generation, step_id) = submit(&mut machine, ActionId::FILL_BURETTE_NAOH);
    machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: incorrect(),
    });

    machine.handle(LabEvent::FeedbackExpired {
        token: success_token,
    });
    let feedback = machine.feedback().expect("failure card must survive");
    assert!(!feedback.is_correct());

    machine.handle(LabEvent::DismissFeedback);
    assert!(machine.feedback().is_none());
}

#[test]
fn complete_verdict_reaches_debrief_exactly_once() {
    let mut machine = machine_in_lab();
    let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);
    let effects = machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: correct(None, true),
    });
    assert_eq!(
        effects,
        vec![Effect::FetchDebriefAfter {
            generation,
            delay: DEBRIEF_DELAY,
        }]
    );
    assert_eq!(machine.phase(), Phase::Lab);
    assert!(machine.feedback().expect("feedback").is_correct());

    // Clicks during the pacing delay do nothing.
    assert!(machine
        .handle(LabEvent::Action(ActionId::from(ActionId::RECORD_READING)))
        .is_empty());

    let effects = machine.handle(LabEvent::DebriefDue { generation });
    assert_eq!(effects, vec![Effect::FetchDebrief { generation }]);

    let debrief = Debrief {
        score: 80,
        completed_steps: 5,
        total_steps: 5,
        mistakes: 1,
        warnings: 0,
        summary: String::new(),
        actions: Vec::new(),
    };
    machine.handle(LabEvent::DebriefLoaded {
        generation,
        debrief: Some(debrief.clone()),
    });
    assert_eq!(machine.phase(), Phase::Debrief);
    assert_eq!(machine.debrief(), Some(&debrief));

    // A duplicate resolution is ignored.
    machine.handle(LabEvent::DebriefLoaded {
        generation,
        debrief: None,
    });
    assert_eq!(machine.phase(), Phase::Debrief);
    assert_eq!(machine.debrief(), Some(&debrief));
}

#[test]
fn failed_debrief_keeps_lab_open_for_resubmission() {
    let mut machine = machine_in_lab();
    let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);
    machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: correct(None, true),
    });
    machine.handle(LabEvent::DebriefDue { generation });
    machine.handle(LabEvent::DebriefLoaded {
        generation,
        debrief: None,
    });

    assert_eq!(machine.phase(), Phase::Lab);
    assert!(machine.debrief().is_none());
    submit(&mut machine, ActionId::WEAR_PPE);
}

fn machine_in_debrief() -> LabMachine {
    let mut machine = machine_in_lab();
    let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);
    machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: correct(Some(step(StepId::FillBurette, ActionId::FILL_BURETTE_HCL)), false),
    });
    let (generation, step_id) = submit(&mut machine, ActionId::FILL_BURETTE_HCL);
    machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: correct(None, true),
    });
    machine.handle(LabEvent::DebriefDue { generation });
    machine.handle(LabEvent::DebriefLoaded {
        generation,
        debrief: Some(Debrief {
            score: 100,
            completed_steps: 2,
            total_steps: 5,
            mistakes: 0,
            warnings: 0,
            summary: String::new(),
            actions: Vec::new(),
        }),
    });
    assert_eq!(machine.phase(), Phase::Debrief);
    machine
}

#[test]
fn retry_resets_run_and_refetches_scenario() {
    let mut machine = machine_in_debrief();
    let before = machine.generation();

    let effects = machine.handle(LabEvent::Retry);

    assert_eq!(effects, vec![Effect::FetchScenario]);
    assert_eq!(machine.phase(), Phase::Intro);
    assert_eq!(machine.completed(), 0);
    assert!(machine.feedback().is_none());
    assert!(machine.debrief().is_none());
    assert!(machine.generation() > before);
    assert_eq!(machine.current_step().map(|s| s.id), Some(StepId::Start));
}

#[test]
fn retry_outside_debrief_is_noop() {
    let mut machine = machine_in_lab();
    assert!(machine.handle(LabEvent::Retry).is_empty());
    assert_eq!(machine.phase(), Phase::Lab);
}

#[test]
fn late_results_from_previous_run_are_discarded() {
    let mut machine = machine_in_debrief();
    let stale = machine.generation();
    machine.handle(LabEvent::Retry);
    machine.handle(LabEvent::ScenarioLoaded(Some(scenario())));
    machine.handle(LabEvent::Start);

    assert!(machine.handle(LabEvent::DebriefDue { generation: stale }).is_empty());
    machine.handle(LabEvent::DebriefLoaded {
        generation: stale,
        debrief: None,
    });
    machine.handle(LabEvent::Verdict {
        generation: stale,
        step: StepId::Start,
        result: correct(Some(step(StepId::Titrate, ActionId::TITRATE_CORRECT)), false),
    });

    assert_eq!(machine.phase(), Phase::Lab);
    assert_eq!(machine.completed(), 0);
    assert_eq!(machine.current_step().map(|s| s.id), Some(StepId::Start));
}

#[test]
fn completed_count_never_exceeds_total() {
    let mut machine = LabMachine::new();
    let mut short = scenario();
    short.total_steps = 2;
    machine.handle(LabEvent::ScenarioLoaded(Some(short)));
    machine.handle(LabEvent::Start);

    let mut last = 0;
    for _ in 0..4 {
        let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);
        machine.handle(LabEvent::Verdict {
            generation,
            step: step_id,
            result: correct(Some(step(StepId::Start, ActionId::WEAR_PPE)), false),
        });
        assert!(machine.completed() >= last);
        assert!(machine.completed() <= 2);
        last = machine.completed();
    }
    assert_eq!(machine.completed(), 2);
}

#[test]
fn snapshot_flags_completion_even_when_count_is_capped() {
    let mut machine = LabMachine::new();
    let mut short = scenario();
    short.total_steps = 2;
    machine.handle(LabEvent::ScenarioLoaded(Some(short)));
    machine.handle(LabEvent::Start);

    for _ in 0..3 {
        let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);
        machine.handle(LabEvent::Verdict {
            generation,
            step: step_id,
            result: correct(Some(step(StepId::Start, ActionId::WEAR_PPE)), false),
        });
        let snapshot = machine.snapshot(RequestStatus::default());
        assert!(!snapshot.completing);
    }
    assert_eq!(machine.completed(), 2);

    let (generation, step_id) = submit(&mut machine, ActionId::WEAR_PPE);
    machine.handle(LabEvent::Verdict {
        generation,
        step: step_id,
        result: correct(None, true),
    });
    let snapshot = machine.snapshot(RequestStatus::default());
    assert!(snapshot.completing);
    assert_eq!(snapshot.completed, 2);
    assert!(snapshot.feedback.expect("feedback").is_correct());

    machine.handle(LabEvent::DebriefDue { generation });
    machine.handle(LabEvent::DebriefLoaded {
        generation,
        debrief: None,
    });
    assert!(!machine.snapshot(RequestStatus::default()).completing);
}

#[test]
fn start_clears_stale_feedback() {
    let mut machine = machine_in_debrief();
    machine.handle(LabEvent::Retry);
    machine.handle(LabEvent::ScenarioLoaded(Some(scenario())));
    machine.handle(LabEvent::Start);
    assert!(machine.feedback().is_none());
    assert_eq!(machine.phase(), Phase::Lab);
}

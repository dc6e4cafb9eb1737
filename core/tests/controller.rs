use songvote_core::{
    AdvanceControl, ApiError, ApiResponse, ArtistRecord, CandidateId, Command, Controller, Direction,
    DispatchError, FailurePolicy, FinalVote, Intent, Request, RosterResponse, RoundKind, Score,
    ScoreVote, VotePayload,
};

fn artist(id: u32, advanced: bool) -> ArtistRecord {
    ArtistRecord {
        id: CandidateId(id),
        name: format!("Artist {id}"),
        order: Some(id as i64 * 10),
        score: None,
        advanced,
        official: false,
        semi: None,
    }
}

fn roster(admin: bool, artists: Vec<ArtistRecord>) -> RosterResponse {
    RosterResponse { admin, artists }
}

fn loaded(kind: RoundKind, response: RosterResponse) -> Controller {
    let mut controller = Controller::new(kind);
    let commands = controller.handle(Intent::Load).expect("load always dispatches");
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].request, Request::FetchRoster(kind));
    let follow_up = controller.complete(commands[0].id, Ok(ApiResponse::Roster(response)));
    assert!(follow_up.is_empty());
    controller
}

fn final_vote(command: &Command) -> Option<(CandidateId, bool)> {
    match &command.request {
        Request::SubmitVote {
            vote: VotePayload::Final(FinalVote {
                artist_id,
                advanced,
            }),
            ..
        } => Some((*artist_id, *advanced)),
        _ => None,
    }
}

fn ack_all(controller: &mut Controller, commands: &[Command]) {
    for command in commands {
        assert!(controller
            .complete(command.id, Ok(ApiResponse::Ack))
            .is_empty());
    }
}

fn active_ids(controller: &Controller) -> Vec<CandidateId> {
    controller
        .rows()
        .iter()
        .filter(|row| row.advance.active)
        .map(|row| row.id)
        .collect()
}

#[test]
fn intents_before_load_are_rejected() {
    let mut controller = Controller::new(RoundKind::SemiFinal(1));
    assert_eq!(
        controller.handle(Intent::ToggleAdvance { id: CandidateId(1) }),
        Err(DispatchError::NotLoaded(RoundKind::SemiFinal(1)))
    );
    assert!(controller.rows().is_empty());
}

#[test]
fn semi_final_rows_keep_server_order_and_labels() {
    let controller = loaded(
        RoundKind::SemiFinal(2),
        roster(false, vec![artist(3, true), artist(1, false)]),
    );
    let rows = controller.rows();
    assert_eq!(rows[0].ordinal, 30);
    assert_eq!(rows[1].ordinal, 10);
    assert_eq!(rows[0].advance.label, "FINAL");
    assert_eq!(rows[1].advance.label, "Pass to final");
    assert!(rows.iter().all(|row| row.official.is_none() && !row.reorderable));
}

#[test]
fn grand_final_rows_use_render_index() {
    let mut first = artist(8, false);
    first.official = true;
    let controller = loaded(
        RoundKind::GrandFinal,
        roster(true, vec![first, artist(2, true)]),
    );
    let rows = controller.rows();
    assert_eq!(rows[0].ordinal, 1);
    assert_eq!(rows[1].ordinal, 2);
    assert_eq!(rows[0].advance.label, "Select winner");
    assert_eq!(rows[1].advance.label, "WINNER");
    assert_eq!(rows[0].official.map(|view| view.label), Some("Remove"));
    assert_eq!(rows[1].official.map(|view| view.label), Some("Add"));
    assert!(rows[0].reorderable);
    assert!(!rows[1].reorderable);
}

#[test]
fn eleventh_selection_is_blocked_without_a_write() {
    let mut artists: Vec<ArtistRecord> = (1..=10).map(|id| artist(id, true)).collect();
    artists.push(artist(11, false));
    let mut controller = loaded(RoundKind::SemiFinal(1), roster(false, artists));

    let result = controller.handle(Intent::ToggleAdvance { id: CandidateId(11) });
    assert_eq!(
        result,
        Err(DispatchError::SelectionBlocked {
            id: CandidateId(11),
            limit: 10
        })
    );
    assert_eq!(controller.in_flight(), 0);
    assert_eq!(controller.controls()[10], AdvanceControl::Blocked);
    let row = &controller.rows()[10];
    assert!(row.advance.disabled);
    assert!(!row.advance.active);
}

#[test]
fn deselecting_at_limit_reenables_others() {
    let mut artists: Vec<ArtistRecord> = (1..=10).map(|id| artist(id, true)).collect();
    artists.push(artist(11, false));
    let mut controller = loaded(RoundKind::SemiFinal(1), roster(false, artists));

    let commands = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(3) })
        .expect("active controls are always enabled");
    assert_eq!(commands.len(), 1);
    assert_eq!(final_vote(&commands[0]), Some((CandidateId(3), false)));
    assert!(!controller.rows()[10].advance.disabled);
}

#[test]
fn new_winner_clears_previous_first() {
    let mut controller = loaded(
        RoundKind::GrandFinal,
        roster(false, vec![artist(1, true), artist(2, false)]),
    );

    let commands = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(2) })
        .expect("grand final replaces its winner");
    let votes: Vec<_> = commands.iter().filter_map(final_vote).collect();
    assert_eq!(
        votes,
        vec![(CandidateId(1), false), (CandidateId(2), true)]
    );
    assert!(commands[0].id < commands[1].id);
    assert_eq!(active_ids(&controller), vec![CandidateId(2)]);
    let rows = controller.rows();
    assert_eq!(rows[0].advance.label, "Select winner");
    assert_eq!(rows[1].advance.label, "WINNER");
}

#[test]
fn rapid_winner_changes_keep_one_winner() {
    let mut controller = loaded(
        RoundKind::GrandFinal,
        roster(false, vec![artist(1, false), artist(2, false), artist(3, false)]),
    );
    let mut in_flight = Vec::new();
    for id in [1, 2, 3, 1] {
        in_flight.extend(
            controller
                .handle(Intent::ToggleAdvance { id: CandidateId(id) })
                .expect("toggle dispatches"),
        );
        assert_eq!(active_ids(&controller).len(), 1);
    }
    assert_eq!(active_ids(&controller), vec![CandidateId(1)]);
    assert_eq!(controller.in_flight(), in_flight.len());
    ack_all(&mut controller, &in_flight);
    assert_eq!(controller.in_flight(), 0);
    assert_eq!(active_ids(&controller), vec![CandidateId(1)]);
}

#[test]
fn double_toggle_restores_state_with_two_writes() {
    let mut controller = loaded(
        RoundKind::SemiFinal(1),
        roster(false, vec![artist(1, false), artist(2, true)]),
    );
    let before = controller.rows();
    let first = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(1) })
        .expect("first toggle");
    let second = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(1) })
        .expect("second toggle");
    assert_eq!(final_vote(&first[0]), Some((CandidateId(1), true)));
    assert_eq!(final_vote(&second[0]), Some((CandidateId(1), false)));
    assert_eq!(controller.rows(), before);
}

#[test]
fn score_write_is_independent_of_selection() {
    let mut controller = loaded(
        RoundKind::SemiFinal(1),
        roster(false, vec![artist(1, true)]),
    );
    let seven = Score::new(7).ok();
    let commands = controller
        .handle(Intent::SetScore {
            id: CandidateId(1),
            score: seven,
        })
        .expect("score dispatches");
    assert_eq!(
        commands[0].request,
        Request::SubmitVote {
            round: RoundKind::SemiFinal(1),
            vote: VotePayload::Score(ScoreVote {
                artist_id: CandidateId(1),
                score: seven,
            }),
        }
    );
    controller
        .handle(Intent::SetScore {
            id: CandidateId(1),
            score: None,
        })
        .expect("clearing dispatches");
    let row = &controller.rows()[0];
    assert_eq!(row.score, None);
    assert!(row.advance.active);
}

#[test]
fn reload_reflects_saved_score() {
    let mut controller = loaded(
        RoundKind::SemiFinal(1),
        roster(false, vec![artist(1, false)]),
    );
    let seven = Score::new(7).ok();
    let commands = controller
        .handle(Intent::SetScore {
            id: CandidateId(1),
            score: seven,
        })
        .expect("score dispatches");
    ack_all(&mut controller, &commands);

    let reload = controller.handle(Intent::Load).expect("reload");
    let mut saved = artist(1, false);
    saved.score = seven;
    controller.complete(
        reload[0].id,
        Ok(ApiResponse::Roster(roster(false, vec![saved]))),
    );
    assert_eq!(controller.rows()[0].score, seven);
    assert_eq!(controller.round().map(|round| round.generation), Some(2));
}

#[test]
fn admin_actions_reload_instead_of_patching() {
    let mut official = artist(5, false);
    official.official = true;
    let mut controller = loaded(
        RoundKind::GrandFinal,
        roster(true, vec![artist(4, false), official]),
    );
    let before = controller.rows();

    let toggle = controller
        .handle(Intent::ToggleOfficial { id: CandidateId(4) })
        .expect("admin toggle");
    assert_eq!(toggle.len(), 1);
    assert_eq!(toggle[0].request, Request::ToggleOfficial(CandidateId(4)));
    assert_eq!(controller.rows(), before);

    let reload = controller.complete(toggle[0].id, Ok(ApiResponse::Ack));
    assert_eq!(reload.len(), 1);
    assert_eq!(reload[0].request, Request::FetchRoster(RoundKind::GrandFinal));

    let moved = controller
        .handle(Intent::Move {
            id: CandidateId(5),
            direction: Direction::Up,
        })
        .expect("reorder official finalist");
    assert_eq!(controller.rows(), before);
    let reload = controller.complete(moved[0].id, Err(ApiError::Status(500)));
    assert_eq!(reload.len(), 1);
    assert_eq!(reload[0].request, Request::FetchRoster(RoundKind::GrandFinal));
}

#[test]
fn admin_actions_require_rights_and_context() {
    let mut controller = loaded(
        RoundKind::SemiFinal(1),
        roster(false, vec![artist(1, false)]),
    );
    assert_eq!(
        controller.handle(Intent::ToggleOfficial { id: CandidateId(1) }),
        Err(DispatchError::AdminOnly)
    );

    let mut official = artist(1, false);
    official.official = true;
    let mut semi_admin = loaded(RoundKind::SemiFinal(1), roster(true, vec![official]));
    assert_eq!(
        semi_admin.handle(Intent::Move {
            id: CandidateId(1),
            direction: Direction::Down,
        }),
        Err(DispatchError::NotReorderable(CandidateId(1)))
    );

    let mut grand_admin = loaded(RoundKind::GrandFinal, roster(true, vec![artist(2, false)]));
    assert_eq!(
        grand_admin.handle(Intent::Move {
            id: CandidateId(2),
            direction: Direction::Down,
        }),
        Err(DispatchError::NotReorderable(CandidateId(2)))
    );
    assert_eq!(
        grand_admin.handle(Intent::ToggleOfficial { id: CandidateId(99) }),
        Err(DispatchError::UnknownCandidate(CandidateId(99)))
    );
}

#[test]
fn failed_load_keeps_previous_rows() {
    let mut controller = loaded(
        RoundKind::SemiFinal(1),
        roster(false, vec![artist(1, false)]),
    );
    let reload = controller.handle(Intent::Load).expect("reload");
    controller.complete(reload[0].id, Err(ApiError::Status(401)));
    assert_eq!(controller.rows().len(), 1);

    let mut fresh = Controller::new(RoundKind::SemiFinal(1));
    let load = fresh.handle(Intent::Load).expect("load");
    fresh.complete(load[0].id, Err(ApiError::Network("offline".to_string())));
    assert!(!fresh.is_loaded());
    assert!(fresh.rows().is_empty());
}

#[test]
fn superseded_roster_response_is_ignored() {
    let mut controller = Controller::new(RoundKind::SemiFinal(1));
    let first = controller.handle(Intent::Load).expect("first load");
    let second = controller.handle(Intent::Load).expect("second load");

    controller.complete(
        second[0].id,
        Ok(ApiResponse::Roster(roster(false, vec![artist(2, false)]))),
    );
    controller.complete(
        first[0].id,
        Ok(ApiResponse::Roster(roster(false, vec![artist(1, false)]))),
    );
    let ids: Vec<_> = controller.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![CandidateId(2)]);
}

#[test]
fn failed_write_keeps_optimistic_state_by_default() {
    let mut controller = loaded(
        RoundKind::SemiFinal(1),
        roster(false, vec![artist(1, false)]),
    );
    assert_eq!(controller.failure_policy(), FailurePolicy::Keep);
    let commands = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(1) })
        .expect("toggle");
    controller.complete(commands[0].id, Err(ApiError::Status(500)));
    assert_eq!(active_ids(&controller), vec![CandidateId(1)]);
}

#[test]
fn revert_policy_restores_failed_writes() {
    let mut controller = Controller::new(RoundKind::SemiFinal(1))
        .with_failure_policy(FailurePolicy::Revert);
    let load = controller.handle(Intent::Load).expect("load");
    let mut scored = artist(1, false);
    scored.score = Score::new(4).ok();
    controller.complete(
        load[0].id,
        Ok(ApiResponse::Roster(roster(false, vec![scored]))),
    );

    let toggle = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(1) })
        .expect("toggle");
    let score = controller
        .handle(Intent::SetScore {
            id: CandidateId(1),
            score: Score::new(9).ok(),
        })
        .expect("score");
    controller.complete(toggle[0].id, Err(ApiError::Status(500)));
    controller.complete(score[0].id, Err(ApiError::Network("reset".to_string())));

    let row = &controller.rows()[0];
    assert!(!row.advance.active);
    assert_eq!(row.score, Score::new(4).ok());
}

#[test]
fn revert_never_produces_a_second_winner() {
    let mut controller = Controller::new(RoundKind::GrandFinal)
        .with_failure_policy(FailurePolicy::Revert);
    let load = controller.handle(Intent::Load).expect("load");
    controller.complete(
        load[0].id,
        Ok(ApiResponse::Roster(roster(
            false,
            vec![artist(1, true), artist(2, false)],
        ))),
    );
    let commands = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(2) })
        .expect("replace winner");
    // Clear for 1 fails, set for 2 succeeds.
    controller.complete(commands[1].id, Ok(ApiResponse::Ack));
    controller.complete(commands[0].id, Err(ApiError::Status(503)));
    assert_eq!(active_ids(&controller), vec![CandidateId(2)]);
}

#[test]
fn write_completions_after_reload_do_not_touch_new_rows() {
    let mut controller = Controller::new(RoundKind::SemiFinal(1))
        .with_failure_policy(FailurePolicy::Revert);
    let load = controller.handle(Intent::Load).expect("load");
    controller.complete(
        load[0].id,
        Ok(ApiResponse::Roster(roster(false, vec![artist(1, false)]))),
    );
    let toggle = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(1) })
        .expect("toggle");
    let reload = controller.handle(Intent::Load).expect("reload");
    controller.complete(
        reload[0].id,
        Ok(ApiResponse::Roster(roster(false, vec![artist(1, true)]))),
    );
    controller.complete(toggle[0].id, Err(ApiError::Status(500)));
    assert_eq!(active_ids(&controller), vec![CandidateId(1)]);
}

#[test]
fn unknown_completion_is_ignored() {
    let mut controller = loaded(
        RoundKind::SemiFinal(1),
        roster(false, vec![artist(1, false)]),
    );
    let commands = controller
        .handle(Intent::ToggleAdvance { id: CandidateId(1) })
        .expect("toggle");
    ack_all(&mut controller, &commands);
    assert!(controller
        .complete(commands[0].id, Ok(ApiResponse::Ack))
        .is_empty());
}

//! Workflow engine integration tests
//!
//! Drive status changes through the full service stack on in-memory stores.

mod helpers;

use assert_matches::assert_matches;
use chrono::Duration;
use helpers::*;
use promoflow::models::{CommentType, EventStatus, NotificationType, RelatedEntity, StatusChange};
use promoflow::services::ChangeStatusRequest;
use promoflow::state::transitions::rule_for;
use promoflow::{ErrorKind, PromoFlowError};

#[tokio::test]
async fn test_marketing_manager_completes_event_with_actuals() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Spring open house").await;
    ctx.place_in(&event, EventStatus::Approved).await;
    ctx.set_actuals(&event, Some(full_actuals())).await;

    let change = ctx
        .services
        .workflow_service
        .change_status(cast.marketing_manager.id, ChangeStatusRequest::new(event.id, "completed"))
        .await
        .unwrap();

    assert_eq!(
        change,
        StatusChange {
            previous_status: EventStatus::Approved,
            new_status: EventStatus::Completed,
        }
    );
    assert_eq!(ctx.reload(event.id).await.status, EventStatus::Completed);

    let notifications = ctx.notification_store.all().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, cast.sales.id);
    assert_eq!(notifications[0].notification_type, NotificationType::EventUpdated);
    assert_eq!(notifications[0].related, RelatedEntity::Event { id: event.id });
    assert!(notifications[0].message.contains("completed"));
}

#[tokio::test]
async fn test_missing_edge_rejected_even_for_admin() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Dealer day").await;

    let err = ctx
        .services
        .workflow_service
        .change_status(cast.admin.id, ChangeStatusRequest::new(event.id, "rejected"))
        .await
        .unwrap_err();

    assert_matches!(err, PromoFlowError::InvalidTransition { .. });
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert_eq!(err.to_api_error().message, "Invalid status transition");
    assert_eq!(ctx.reload(event.id).await.status, EventStatus::Draft);
}

#[tokio::test]
async fn test_same_status_is_never_a_transition() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Mall kiosk").await;

    for status in EventStatus::ALL {
        ctx.place_in(&event, status).await;
        ctx.set_actuals(&event, Some(full_actuals())).await;

        let err = ctx
            .services
            .workflow_service
            .change_status(cast.admin.id, ChangeStatusRequest::new(event.id, status.as_str()))
            .await
            .unwrap_err();
        assert_matches!(err, PromoFlowError::InvalidTransition { .. }, "self-loop on {}", status);
    }
}

#[tokio::test]
async fn test_completion_gate_lists_missing_cost() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Test drive week").await;
    ctx.place_in(&event, EventStatus::Approved).await;

    let mut event = ctx.reload(event.id).await;
    event.actual_budget = Some(0.0);
    event.actual_enquiries = Some(5);
    event.actual_orders = Some(2);
    ctx.db.events.save(&event).await.unwrap();

    let err = ctx
        .services
        .workflow_service
        .change_status(cast.marketing_manager.id, ChangeStatusRequest::new(event.id, "completed"))
        .await
        .unwrap_err();

    assert_matches!(err, PromoFlowError::Validation(ref message) if message == "Missing required fields: Actual Cost");
    assert_eq!(ctx.reload(event.id).await.status, EventStatus::Approved);
}

#[tokio::test]
async fn test_completion_gate_lists_every_missing_field() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Test drive week").await;
    ctx.place_in(&event, EventStatus::Approved).await;

    let err = ctx
        .services
        .workflow_service
        .change_status(cast.marketing_manager.id, ChangeStatusRequest::new(event.id, "completed"))
        .await
        .unwrap_err();

    let message = err.to_string();
    for label in ["Actual Cost", "Actual Leads", "Actual Orders"] {
        assert!(message.contains(label), "{} missing from {}", label, message);
    }
}

#[tokio::test]
async fn test_metrics_checked_before_permission() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Roadshow").await;
    ctx.place_in(&event, EventStatus::Approved).await;

    let err = ctx
        .services
        .workflow_service
        .change_status(cast.plain_user.id, ChangeStatusRequest::new(event.id, "completed"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    ctx.set_actuals(&event, Some(full_actuals())).await;
    let err = ctx
        .services
        .workflow_service
        .change_status(cast.plain_user.id, ChangeStatusRequest::new(event.id, "completed"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_final_approval_does_not_require_actuals() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Launch evening").await;
    ctx.place_in(&event, EventStatus::PendingMarketing).await;

    let change = ctx
        .services
        .workflow_service
        .change_status(cast.marketing_head.id, ChangeStatusRequest::new(event.id, "approved"))
        .await
        .unwrap();
    assert_eq!(change.new_status, EventStatus::Approved);

    let notifications = ctx.notification_store.all().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].notification_type, NotificationType::EventApproved);
}

#[tokio::test]
async fn test_creator_restriction_on_draft() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Colleague's draft").await;
    let workflow = &ctx.services.workflow_service;

    let err = workflow
        .change_status(cast.gm.id, ChangeStatusRequest::new(event.id, "pending_gm"))
        .await
        .unwrap_err();
    assert_matches!(err, PromoFlowError::Forbidden(ref reason) if reason.contains("sales_manager and admin"));

    let err = workflow
        .change_status(cast.other_sales.id, ChangeStatusRequest::new(event.id, "pending_gm"))
        .await
        .unwrap_err();
    assert_matches!(err, PromoFlowError::Forbidden(ref reason) if reason.contains("Only the event creator"));

    let err = workflow
        .change_status(cast.gm.id, ChangeStatusRequest::new(event.id, "pending_marketing"))
        .await
        .unwrap_err();
    assert_matches!(err, PromoFlowError::Forbidden(ref reason) if reason.contains("Only the event creator"));

    assert_eq!(ctx.reload(event.id).await.status, EventStatus::Draft);

    workflow
        .change_status(cast.sales.id, ChangeStatusRequest::new(event.id, "pending_gm"))
        .await
        .unwrap();
    assert_eq!(ctx.reload(event.id).await.status, EventStatus::PendingGm);
}

#[tokio::test]
async fn test_gm_fast_tracks_own_draft() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.gm, "Branch anniversary").await;

    ctx.services
        .workflow_service
        .change_status(cast.gm.id, ChangeStatusRequest::new(event.id, "pending_marketing"))
        .await
        .unwrap();

    assert_eq!(ctx.reload(event.id).await.status, EventStatus::PendingMarketing);
    // no milestone for draft -> pending_marketing, and the actor is the organizer
    assert!(ctx.notification_store.all().await.is_empty());
}

#[tokio::test]
async fn test_rejected_event_reopened_only_by_creator() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Rejected promo").await;
    ctx.place_in(&event, EventStatus::Rejected).await;

    let err = ctx
        .services
        .workflow_service
        .change_status(cast.gm.id, ChangeStatusRequest::new(event.id, "draft"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    ctx.services
        .workflow_service
        .change_status(cast.admin.id, ChangeStatusRequest::new(event.id, "draft"))
        .await
        .unwrap();

    let notifications = ctx.notification_store.all().await;
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].message.contains("ready for revision"));
}

#[tokio::test]
async fn test_gm_forwards_with_comment() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Summer sale").await;
    ctx.place_in(&event, EventStatus::PendingGm).await;

    ctx.services
        .workflow_service
        .change_status(
            cast.gm.id,
            ChangeStatusRequest::new(event.id, "pending_marketing").with_comment("  Looks good, budget is fine  "),
        )
        .await
        .unwrap();

    let comments = ctx.services.event_service.list_comments(event.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment, "Looks good, budget is fine");
    assert_eq!(comments[0].comment_type, CommentType::Approval);
    assert_eq!(comments[0].status_from, Some(EventStatus::PendingGm));
    assert_eq!(comments[0].status_to, Some(EventStatus::PendingMarketing));
    assert_eq!(comments[0].user_id, cast.gm.id);

    let notifications = ctx.notification_store.all().await;
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.user_id == cast.sales.id));
    assert!(notifications.iter().all(|n| n.notification_type == NotificationType::EventUpdated));
    assert!(notifications[0].message.contains("progressed to marketing review"));
    assert!(notifications[1].message.contains("Looks good, budget is fine"));
}

#[tokio::test]
async fn test_gm_review_is_not_branch_scoped() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Northern roadshow").await;
    assert_eq!(event.branch_id, BRANCH_NORTH);
    ctx.place_in(&event, EventStatus::PendingGm).await;

    // a GM from another branch may forward, though not edit
    let edit = ctx.services.event_service.check_edit_permission(event.id, cast.other_gm.id).await.unwrap();
    assert!(!edit.allowed);

    let change = ctx
        .services
        .workflow_service
        .change_status(cast.other_gm.id, ChangeStatusRequest::new(event.id, "pending_marketing"))
        .await
        .unwrap();
    assert_eq!(change.previous_status, EventStatus::PendingGm);
    assert_eq!(ctx.reload(event.id).await.status, EventStatus::PendingMarketing);
}

#[tokio::test]
async fn test_organizer_comment_does_not_notify_self() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Own submission").await;

    ctx.services
        .workflow_service
        .change_status(
            cast.sales.id,
            ChangeStatusRequest::new(event.id, "pending_gm").with_comment("Ready for review"),
        )
        .await
        .unwrap();

    let comments = ctx.services.event_service.list_comments(event.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment_type, CommentType::General);
    assert!(ctx.notification_store.all().await.is_empty());
}

#[tokio::test]
async fn test_rejection_notifies_with_reason() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Expensive gala").await;
    ctx.place_in(&event, EventStatus::PendingGm).await;

    ctx.services
        .workflow_service
        .change_status(
            cast.gm.id,
            ChangeStatusRequest::new(event.id, "rejected").with_comment("Budget exceeds the quarterly plan"),
        )
        .await
        .unwrap();

    let comments = ctx.services.event_service.list_comments(event.id).await.unwrap();
    assert_eq!(comments[0].comment_type, CommentType::Rejection);

    let notifications = ctx.notification_store.all().await;
    let rejection = notifications
        .iter()
        .find(|n| n.notification_type == NotificationType::EventRejected)
        .expect("rejection notification");
    assert!(rejection.message.contains(&cast.gm.name));
    assert!(rejection.message.contains("Reason: Budget exceeds the quarterly plan"));
}

#[tokio::test]
async fn test_blank_comment_is_not_recorded() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Quiet submission").await;

    ctx.services
        .workflow_service
        .change_status(cast.sales.id, ChangeStatusRequest::new(event.id, "pending_gm").with_comment("   "))
        .await
        .unwrap();

    assert!(ctx.services.event_service.list_comments(event.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_review_cycle_repeats() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Revised campaign").await;
    ctx.place_in(&event, EventStatus::Rejected).await;

    let cycles = 3;
    let steps = [
        (cast.sales.id, "draft"),
        (cast.sales.id, "pending_gm"),
        (cast.gm.id, "pending_marketing"),
        (cast.marketing_head.id, "rejected"),
    ];

    for cycle in 0..cycles {
        for (actor_id, status) in steps {
            ctx.services
                .workflow_service
                .change_status(
                    actor_id,
                    ChangeStatusRequest::new(event.id, status).with_comment(format!("cycle {} -> {}", cycle, status)),
                )
                .await
                .unwrap();
        }
    }

    assert_eq!(ctx.reload(event.id).await.status, EventStatus::Rejected);

    let comments = ctx.services.event_service.list_comments(event.id).await.unwrap();
    assert_eq!(comments.len(), cycles * steps.len());
    for comment in &comments {
        let (from, to) = (comment.status_from.unwrap(), comment.status_to.unwrap());
        assert!(rule_for(from, to).is_some(), "{} -> {} has no edge", from, to);
    }
}

#[tokio::test]
async fn test_notification_failure_keeps_status_change() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Flaky inbox").await;
    ctx.place_in(&event, EventStatus::PendingMarketing).await;
    ctx.notification_store.set_failing(true);

    let change = ctx
        .services
        .workflow_service
        .change_status(
            cast.marketing_head.id,
            ChangeStatusRequest::new(event.id, "approved").with_comment("Approved for Q2"),
        )
        .await
        .unwrap();

    assert_eq!(change.new_status, EventStatus::Approved);
    assert_eq!(ctx.reload(event.id).await.status, EventStatus::Approved);
    assert_eq!(ctx.services.event_service.list_comments(event.id).await.unwrap().len(), 1);
    assert!(ctx.notification_store.all().await.is_empty());
}

#[tokio::test]
async fn test_unknown_status_and_ids() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Lookup checks").await;
    let workflow = &ctx.services.workflow_service;

    let err = workflow
        .change_status(cast.sales.id, ChangeStatusRequest::new(event.id, "PendingGm"))
        .await
        .unwrap_err();
    assert_matches!(err, PromoFlowError::Validation(ref message) if message == "Invalid status: PendingGm");

    // status strings are exact; padding is not stripped
    let err = workflow
        .change_status(cast.sales.id, ChangeStatusRequest::new(event.id, " pending_gm\n"))
        .await
        .unwrap_err();
    assert_matches!(err, PromoFlowError::Validation(ref message) if message == "Invalid status:  pending_gm\n");
    assert_eq!(ctx.reload(event.id).await.status, EventStatus::Draft);

    let err = workflow
        .change_status(cast.sales.id, ChangeStatusRequest::new(9999, "pending_gm"))
        .await
        .unwrap_err();
    assert_matches!(err, PromoFlowError::NotFound { entity: "Event", id: 9999 });
    assert_eq!(err.to_api_error().message, "Event not found: 9999");

    let err = workflow
        .change_status(4242, ChangeStatusRequest::new(event.id, "pending_gm"))
        .await
        .unwrap_err();
    assert_matches!(err, PromoFlowError::NotFound { entity: "User", id: 4242 });
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_transition_bumps_updated_at() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Timestamped").await;

    ctx.clock.advance(Duration::hours(5));
    ctx.services
        .workflow_service
        .change_status(cast.sales.id, ChangeStatusRequest::new(event.id, "pending_gm"))
        .await
        .unwrap();

    let reloaded = ctx.reload(event.id).await;
    assert_eq!(reloaded.created_at, start_instant());
    assert_eq!(reloaded.updated_at, start_instant() + Duration::hours(5));
}

#[tokio::test]
async fn test_available_transitions_follow_both_gates() {
    let ctx = TestContext::new();
    let cast = Cast::new(&ctx).await;
    let event = ctx.draft_event(&cast.sales, "Options").await;
    let workflow = &ctx.services.workflow_service;

    assert_eq!(
        workflow.available_transitions(event.id, cast.sales.id).await.unwrap(),
        vec![EventStatus::PendingGm]
    );
    assert!(workflow.available_transitions(event.id, cast.gm.id).await.unwrap().is_empty());
    assert_eq!(
        workflow.available_transitions(event.id, cast.admin.id).await.unwrap(),
        vec![EventStatus::PendingGm, EventStatus::PendingMarketing]
    );

    ctx.place_in(&event, EventStatus::PendingGm).await;
    let mut options = workflow.available_transitions(event.id, cast.gm.id).await.unwrap();
    options.sort();
    assert_eq!(
        options,
        vec![EventStatus::Draft, EventStatus::PendingMarketing, EventStatus::Rejected]
    );

    let decision = workflow
        .check_transition(event.id, cast.marketing_head.id, EventStatus::PendingMarketing)
        .await
        .unwrap();
    assert!(!decision.allowed);
}

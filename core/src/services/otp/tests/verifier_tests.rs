//! Unit tests for the OTP verifier

use chrono::Duration;

use crate::errors::DomainError;
use crate::repositories::{OtpRepository, UserRepository};
use crate::services::otp::{IssueOutcome, VerifyOutcome};

use super::mocks::Harness;

async fn issue(h: &Harness, email: &str) -> (i64, String) {
    match h.issuer.issue_otp(email, None).await.unwrap() {
        IssueOutcome::Issued(issued) => (issued.record.user_id, issued.record.code),
        other => panic!("expected Issued, got {:?}", other),
    }
}

#[tokio::test]
async fn test_verify_correct_code() {
    let h = Harness::new();
    let (user_id, code) = issue(&h, "a@vet.example").await;

    let outcome = h.verifier.verify_otp("a@vet.example", &code).await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Verified { user_id });
    let record = h.repo.find_current("a@vet.example").await.unwrap().unwrap();
    assert!(record.used);
    let user = h.users.find_by_id(user_id).await.unwrap().unwrap();
    assert!(user.is_verified);
}

#[tokio::test]
async fn test_resubmitting_verified_code_is_already_used() {
    let h = Harness::new();
    let (_, code) = issue(&h, "a@vet.example").await;

    h.verifier.verify_otp("a@vet.example", &code).await.unwrap();
    let outcome = h.verifier.verify_otp("a@vet.example", &code).await.unwrap();

    assert_eq!(outcome, VerifyOutcome::AlreadyUsed);
}

#[tokio::test]
async fn test_mismatch_then_correct_code() {
    let h = Harness::with_fixed_code("123456");
    let (user_id, _) = issue(&h, "a@vet.example").await;

    let outcome = h.verifier.verify_otp("a@vet.example", "654321").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch { attempts: 1 });
    let record = h.repo.find_current("a@vet.example").await.unwrap().unwrap();
    assert_eq!(record.attempts, 1);
    assert!(!record.used);

    let outcome = h.verifier.verify_otp("a@vet.example", "123456").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified { user_id });
}

#[tokio::test]
async fn test_attempts_are_unbounded() {
    let h = Harness::with_fixed_code("123456");
    let (user_id, _) = issue(&h, "a@vet.example").await;

    for expected in 1..=12 {
        let outcome = h.verifier.verify_otp("a@vet.example", "000000").await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Mismatch { attempts: expected });
    }

    let outcome = h.verifier.verify_otp("a@vet.example", "123456").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified { user_id });
}

#[tokio::test]
async fn test_expired_code_even_if_correct() {
    let h = Harness::with_fixed_code("123456");
    issue(&h, "a@vet.example").await;

    h.clock.advance(Duration::minutes(10) + Duration::seconds(1));
    let outcome = h.verifier.verify_otp("a@vet.example", "123456").await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Expired);
    let record = h.repo.find_current("a@vet.example").await.unwrap().unwrap();
    assert!(!record.used);
    assert_eq!(record.attempts, 0);
}

#[tokio::test]
async fn test_code_valid_at_expiry_instant() {
    let h = Harness::with_fixed_code("123456");
    let (user_id, _) = issue(&h, "a@vet.example").await;

    h.clock.advance(Duration::minutes(10));
    let outcome = h.verifier.verify_otp("a@vet.example", "123456").await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Verified { user_id });
}

#[tokio::test]
async fn test_expired_wrong_code_does_not_count_attempt() {
    let h = Harness::with_fixed_code("123456");
    issue(&h, "a@vet.example").await;

    h.clock.advance(Duration::minutes(11));
    let outcome = h.verifier.verify_otp("a@vet.example", "999999").await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Expired);
    let record = h.repo.find_current("a@vet.example").await.unwrap().unwrap();
    assert_eq!(record.attempts, 0);
}

#[tokio::test]
async fn test_used_takes_precedence_over_expired() {
    let h = Harness::with_fixed_code("123456");
    issue(&h, "a@vet.example").await;
    h.verifier.verify_otp("a@vet.example", "123456").await.unwrap();

    h.clock.advance(Duration::hours(1));
    let outcome = h.verifier.verify_otp("a@vet.example", "123456").await.unwrap();

    assert_eq!(outcome, VerifyOutcome::AlreadyUsed);
}

#[tokio::test]
async fn test_unknown_email_is_not_found() {
    let h = Harness::new();

    let outcome = h.verifier.verify_otp("nobody@vet.example", "123456").await.unwrap();

    assert_eq!(outcome, VerifyOutcome::NotFound);
}

#[tokio::test]
async fn test_only_newest_code_is_considered() {
    let h = Harness::new();
    let (_, old_code) = issue(&h, "a@vet.example").await;
    h.clock.advance(Duration::seconds(61));
    let (user_id, new_code) = issue(&h, "a@vet.example").await;

    if old_code != new_code {
        let outcome = h.verifier.verify_otp("a@vet.example", &old_code).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Mismatch { attempts: 1 });
    }

    let outcome = h.verifier.verify_otp("a@vet.example", &new_code).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified { user_id });

    let records = h.repo.records_for("a@vet.example").await;
    assert!(!records[0].used);
    assert!(records[1].used);
}

#[tokio::test]
async fn test_malformed_code_is_validation_error() {
    let h = Harness::with_fixed_code("123456");
    issue(&h, "a@vet.example").await;

    for bad in ["", "12345", "1234567", "12a456", "١٢٣٤٥٦"] {
        let result = h.verifier.verify_otp("a@vet.example", bad).await;
        assert!(
            matches!(result, Err(DomainError::Validation { .. })),
            "code {:?} should be rejected",
            bad
        );
    }

    let record = h.repo.find_current("a@vet.example").await.unwrap().unwrap();
    assert_eq!(record.attempts, 0);
}

#[tokio::test]
async fn test_email_is_normalized_before_lookup() {
    let h = Harness::with_fixed_code("123456");
    let (user_id, _) = issue(&h, "a@vet.example").await;

    let outcome = h.verifier.verify_otp(" A@Vet.Example ", " 123456 ").await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Verified { user_id });
}

#[tokio::test]
async fn test_failed_commit_is_internal_error_and_retryable() {
    let h = Harness::with_fixed_code("123456");
    let (user_id, _) = issue(&h, "a@vet.example").await;

    h.repo.fail_next_verification();
    let result = h.verifier.verify_otp("a@vet.example", "123456").await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));

    let record = h.repo.find_current("a@vet.example").await.unwrap().unwrap();
    assert!(!record.used);
    assert!(!h.users.find_by_id(user_id).await.unwrap().unwrap().is_verified);

    let outcome = h.verifier.verify_otp("a@vet.example", "123456").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified { user_id });
}

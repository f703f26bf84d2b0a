use crate::ca::{CaClient, EnrollmentRequest};
use crate::error::enrollment::EnrollIdentityError;
use crate::error::enrollment::EnrollIdentityError::{
    CheckWalletFailed, EnrollFailed, ImportFailed,
};
use crate::identity::X509Identity;
use crate::wallet::Wallet;
use slog::{debug, info, Logger};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// The wallet already held the label; the CA was not contacted.
    AlreadyEnrolled,
    Enrolled(X509Identity),
}

/// Enrolls with the CA and stores the credential under `label`, unless the wallet
/// already has an identity with that label.
///
/// The existence check and the write are separate steps. Two processes enrolling the
/// same label at once both reach the CA and the later write wins.
pub async fn enroll_identity(
    log: &Logger,
    ca: &CaClient,
    wallet: &dyn Wallet,
    label: &str,
    msp_id: &str,
    request: &EnrollmentRequest,
) -> Result<EnrollOutcome, EnrollIdentityError> {
    let exists = wallet
        .exists(label)
        .map_err(|e| CheckWalletFailed(label.to_string(), e))?;
    if exists {
        info!(
            log,
            r#"An identity for the client user "{}" already exists in the wallet"#, label
        );
        return Ok(EnrollOutcome::AlreadyEnrolled);
    }

    let enrollment = ca
        .enroll(request)
        .await
        .map_err(|e| EnrollFailed(request.enrollment_id.clone(), e))?;
    debug!(log, "Certificate issued"; "ca_name" => enrollment.ca_name.as_deref().unwrap_or("unknown"));
    let identity = X509Identity::new(enrollment.certificate, enrollment.private_key, msp_id);
    wallet
        .put(label, &identity)
        .map_err(|e| ImportFailed(label.to_string(), e))?;

    info!(
        log,
        r#"Successfully enrolled client user "{}" and imported it into the wallet"#, label
    );
    Ok(EnrollOutcome::Enrolled(identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ca::tests::{ca_info, success_body};
    use crate::identity::tests::TEST_CERTIFICATE;
    use crate::identity::X509_IDENTITY_TYPE;
    use crate::wallet::{FileSystemWallet, InMemoryWallet};

    fn logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    #[tokio::test]
    async fn existing_identity_is_kept_and_ca_not_contacted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/enroll")
            .expect(0)
            .create_async()
            .await;
        let ca = CaClient::new(&logger(), &ca_info(&server.url())).unwrap();

        let wallet = InMemoryWallet::new();
        let existing = X509Identity::new("original".to_string(), "key".to_string(), "Org1MSP");
        wallet.put("shane", &existing).unwrap();

        let outcome = enroll_identity(
            &logger(),
            &ca,
            &wallet,
            "shane",
            "Org1MSP",
            &EnrollmentRequest::new("user1", "user1pw"),
        )
        .await
        .unwrap();

        assert_eq!(outcome, EnrollOutcome::AlreadyEnrolled);
        assert_eq!(wallet.get("shane").unwrap(), Some(existing));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn absent_identity_is_enrolled_and_stored_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/enroll")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(success_body())
            .expect(1)
            .create_async()
            .await;
        let ca = CaClient::new(&logger(), &ca_info(&server.url())).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let wallet = FileSystemWallet::new(dir.path()).unwrap();

        let outcome = enroll_identity(
            &logger(),
            &ca,
            &wallet,
            "isabella",
            "Org2MSP",
            &EnrollmentRequest::new("user1", "user1pw"),
        )
        .await
        .unwrap();
        mock.assert_async().await;

        assert_eq!(wallet.list().unwrap(), vec!["isabella"]);
        let stored = wallet.get("isabella").unwrap().unwrap();
        assert_eq!(stored.msp_id, "Org2MSP");
        assert_eq!(stored.identity_type, X509_IDENTITY_TYPE);
        assert_eq!(stored.credentials.certificate, TEST_CERTIFICATE);
        assert_eq!(outcome, EnrollOutcome::Enrolled(stored));
    }

    #[tokio::test]
    async fn failed_enrollment_stores_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/enroll")
            .with_status(401)
            .with_body(r#"{"success":false,"result":null,"errors":[{"code":20,"message":"Authentication failure"}]}"#)
            .create_async()
            .await;
        let ca = CaClient::new(&logger(), &ca_info(&server.url())).unwrap();
        let wallet = InMemoryWallet::new();

        let err = enroll_identity(
            &logger(),
            &ca,
            &wallet,
            "shane",
            "Org1MSP",
            &EnrollmentRequest::new("user1", "nope"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, EnrollFailed(id, _) if id == "user1"));
        assert!(wallet.list().unwrap().is_empty());
    }
}

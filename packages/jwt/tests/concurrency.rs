//! Shared signers under threads and under the tokio runtime

mod common;

use common::{Key, signer};
use cryypt_jws::{Algorithm, Json, JwtError, StandardClaims, TokenBuilder, Verifier};
use std::thread;

#[test]
fn one_signer_serves_many_threads() {
    for alg in [Algorithm::Hs512, Algorithm::Ps256, Algorithm::Es256] {
        let shared = signer(alg, Key::K1);
        let builder = TokenBuilder::from_arc(shared.clone());
        let verifier = Verifier::default().with_shared_signer(shared);

        thread::scope(|scope| {
            for worker in 0..4 {
                let builder = &builder;
                let verifier = &verifier;
                scope.spawn(move || {
                    for round in 0..8 {
                        let claims = StandardClaims::with_subject(format!("{worker}-{round}"));
                        let compact = builder.build(&claims).unwrap().compact();
                        let decoded: StandardClaims = verifier.decode(&compact).unwrap();
                        assert_eq!(decoded, claims);
                    }
                });
            }
        });
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn async_build_and_verify() {
    let shared = signer(Algorithm::Rs384, Key::K1);
    let builder = TokenBuilder::from_arc(shared.clone());
    let verifier = Verifier::default().with_shared_signer(shared);

    let mut pending = Vec::new();
    for n in 0..8 {
        pending.push(builder.build_async(Json(serde_json::json!({ "n": n }))));
    }

    for (n, future) in pending.into_iter().enumerate() {
        let token = future.await.unwrap();
        let verified = verifier.verify_compact_async(token.compact()).await.unwrap();
        assert_eq!(verified, token);

        let decoded: Json<serde_json::Value> = verifier.decode(&token.compact()).unwrap();
        assert_eq!(decoded.into_inner()["n"], n);
    }
}

#[tokio::test]
async fn async_rejections_keep_their_kind() {
    let k1 = TokenBuilder::from_arc(signer(Algorithm::Es256, Key::K1));
    let token = k1.build_async(StandardClaims::default()).await.unwrap();

    let other = Verifier::default().with_shared_signer(signer(Algorithm::Es256, Key::K2));
    assert_eq!(
        other.verify_compact_async(token.compact()).await,
        Err(JwtError::InvalidSignature)
    );
}

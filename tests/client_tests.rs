//! Blockchair client tests against a mock upstream

use blockchair_dashboard::config::ApiConfig;
use blockchair_dashboard::{BlockchainApi, BlockchairClient, ErrorKind};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

const KEY: &str = "test-key";
const ADDRESS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
const TXID: &str = "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16";

fn client_for(server: &Server, credential: Option<&str>) -> BlockchairClient {
    BlockchairClient::new(&ApiConfig {
        base_url: server.url(),
        credential: credential.map(String::from),
        ..Default::default()
    })
    .unwrap()
}

fn key_matcher() -> Matcher {
    Matcher::UrlEncoded("key".into(), KEY.into())
}

#[tokio::test]
async fn test_missing_credential_never_touches_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server, None);

    let err = assert_err!(client.general_stats().await);
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let err = assert_err!(client.chain_stats("bitcoin").await);
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let err = assert_err!(client.recent_transactions("bitcoin", 5).await);
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let err = assert_err!(client.address("bitcoin", ADDRESS).await);
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let err = assert_err!(client.transaction("bitcoin", TXID).await);
    assert_eq!(err.kind(), ErrorKind::Configuration);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_general_stats_tolerates_missing_chains() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/stats")
        .match_query(key_matcher())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": {"bitcoin": {"data": {"blocks": 800000}}}, "ethereum": null}"#)
        .create_async()
        .await;

    let client = client_for(&server, Some(KEY));
    let snapshot = assert_ok!(client.general_stats().await);

    assert_eq!(snapshot.get("bitcoin").unwrap().blocks, Some(800_000));
    assert!(snapshot.get("ethereum").is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_general_stats_with_null_and_cross_chain_entries() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/stats")
        .match_query(key_matcher())
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "bitcoin": {"data": {"blocks": 800_000, "market_price_usd": 64_000.5}},
                    "ethereum": null,
                    "litecoin": {"data": {"blocks": 2_700_000, "best_block_time": "2024-05-01 12:00:00"}},
                    "cross-chain": {"tether": {"data": {"token_count": 3}}}
                },
                "context": {"code": 200}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let snapshot = client_for(&server, Some(KEY)).general_stats().await.unwrap();

    let present: Vec<&str> = snapshot.present().map(|(chain, _)| chain).collect();
    assert_eq!(present, vec!["bitcoin", "litecoin"]);
    assert!(snapshot.contains("ethereum"));
    assert_eq!(
        snapshot.get("litecoin").unwrap().best_block_time.as_deref(),
        Some("2024-05-01 12:00:00")
    );
}

#[tokio::test]
async fn test_payment_required_is_authorization_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .match_query(key_matcher())
        .with_status(402)
        .expect(3)
        .with_body(r#"{"data": null, "context": {"code": 402, "error": "Invalid key"}}"#)
        .create_async()
        .await;

    let client = client_for(&server, Some(KEY));

    let err = client.general_stats().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    let err = client.address("bitcoin", ADDRESS).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    let err = client.recent_transactions("bitcoin", 5).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_other_statuses_are_transient() {
    for status in [400, 401, 404, 429, 430, 500, 503] {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/bitcoin/stats")
            .match_query(key_matcher())
            .with_status(status)
            .with_body(r#"{"data": {"blocks": 1}}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some(KEY))
            .chain_stats("bitcoin")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transient, "status {status}");
    }
}

#[tokio::test]
async fn test_unparsable_body_is_transient() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/stats")
        .match_query(key_matcher())
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server, Some(KEY))
        .general_stats()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert!(err.to_string().contains("malformed response"), "{err}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_body_without_data_is_transient() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/bitcoin/stats")
        .match_query(key_matcher())
        .with_status(200)
        .with_body(r#"{"context": {"code": 200}}"#)
        .create_async()
        .await;

    let err = client_for(&server, Some(KEY))
        .chain_stats("bitcoin")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert!(err.to_string().contains("no data member"), "{err}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_host_is_transient() {
    let client = BlockchairClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        credential: Some(KEY.to_string()),
        ..Default::default()
    })
    .unwrap();

    let err = client.general_stats().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert!(!err.to_string().contains(KEY));
}

#[tokio::test]
async fn test_chain_stats_decodes_record() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/ethereum/stats")
        .match_query(key_matcher())
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "blocks": 19_000_000,
                    "circulation": 120_000_000_000_000_000_000_000_000.0_f64,
                    "market_price_usd": 3_100.25,
                    "market_dominance_percentage": 16.4,
                    "uncles": 1_300_000
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let stats = client_for(&server, Some(KEY))
        .chain_stats("ethereum")
        .await
        .unwrap();
    assert_eq!(stats.blocks, Some(19_000_000));
    assert_eq!(stats.market_price_usd, Some(3_100.25));
    assert_eq!(stats.extra.get("uncles"), Some(&json!(1_300_000)));
}

#[tokio::test]
async fn test_recent_transactions_sends_limit() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/bitcoin/transactions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "5".into()),
            key_matcher(),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "data": [
                    {"block_id": 800_000, "hash": "aa", "fee": 1_200, "is_coinbase": false},
                    {"block_id": -1, "hash": "bb"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let txs = client_for(&server, Some(KEY))
        .recent_transactions("bitcoin", 5)
        .await
        .unwrap();

    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].hash.as_deref(), Some("aa"));
    assert_eq!(txs[0].fee, Some(1_200.0));
    assert!(txs[1].is_pending());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_address_returns_inner_data_unmodified() {
    let inner = json!({
        ADDRESS: {
            "address": {"type": "pubkeyhash", "balance": 5_000_000_000_u64, "transaction_count": 3_800},
            "transactions": ["f4184fc5"],
            "utxo": []
        }
    });

    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("/bitcoin/dashboards/address/{ADDRESS}").as_str())
        .match_query(key_matcher())
        .with_status(200)
        .with_body(json!({"data": inner, "context": {"code": 200}}).to_string())
        .create_async()
        .await;

    let record = client_for(&server, Some(KEY))
        .address("bitcoin", ADDRESS)
        .await
        .unwrap();

    assert_eq!(record, inner);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_transaction_returns_inner_data() {
    let inner = json!({TXID: {"transaction": {"block_id": 170}, "inputs": [], "outputs": []}});

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", format!("/bitcoin/dashboards/transaction/{TXID}").as_str())
        .match_query(key_matcher())
        .with_status(200)
        .with_body(json!({"data": inner}).to_string())
        .create_async()
        .await;

    let record = client_for(&server, Some(KEY))
        .transaction("bitcoin", TXID)
        .await
        .unwrap();
    assert_eq!(record, inner);
}

#[tokio::test]
async fn test_lookup_input_is_percent_encoded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/bitcoin/dashboards/address/not%2Fan%20address")
        .match_query(key_matcher())
        .with_status(200)
        .with_body(r#"{"data": {}}"#)
        .create_async()
        .await;

    let record = client_for(&server, Some(KEY))
        .address("bitcoin", "not/an address")
        .await
        .unwrap();
    assert_eq!(record, json!({}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_lookups_are_independent() {
    let mut server = Server::new_async().await;
    let address_mock = server
        .mock("GET", format!("/bitcoin/dashboards/address/{ADDRESS}").as_str())
        .match_query(key_matcher())
        .with_status(200)
        .with_body(r#"{"data": {"ok": true}}"#)
        .create_async()
        .await;
    let transaction_mock = server
        .mock("GET", format!("/bitcoin/dashboards/transaction/{TXID}").as_str())
        .match_query(key_matcher())
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server, Some(KEY));
    let (address, transaction) = tokio::join!(
        client.address("bitcoin", ADDRESS),
        client.transaction("bitcoin", TXID),
    );

    assert_eq!(address.unwrap(), json!({"ok": true}));
    let err = transaction.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert!(err.to_string().contains("503"), "{err}");
    address_mock.assert_async().await;
    transaction_mock.assert_async().await;
}

#[tokio::test]
async fn test_odd_field_types_do_not_fail_the_record() {
    let mut server = Server::new_async().await;
    let stats_mock = server
        .mock("GET", "/litecoin/stats")
        .match_query(key_matcher())
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "blocks": 2_700_000,
                    "market_price_usd": "85.1",
                    "hashrate_24h": 123_456,
                    "mempool_transactions": {"unexpected": true}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let snapshot_mock = server
        .mock("GET", "/stats")
        .match_query(key_matcher())
        .with_status(200)
        .with_body(
            json!({
                "data": {
                    "bitcoin": {"data": {"blocks": 800_000, "hashrate_24h": 123_456}},
                    "litecoin": {"data": {"blocks": 2_700_000, "market_price_usd": "85.1"}}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, Some(KEY));

    let stats = assert_ok!(client.chain_stats("litecoin").await);
    assert_eq!(stats.blocks, Some(2_700_000));
    assert_eq!(stats.market_price_usd, Some(85.1));
    assert_eq!(stats.hashrate_24h.as_deref(), Some("123456"));
    assert_eq!(stats.mempool_transactions, None);

    let snapshot = assert_ok!(client.general_stats().await);
    let present: Vec<&str> = snapshot.present().map(|(chain, _)| chain).collect();
    assert_eq!(present, vec!["bitcoin", "litecoin"]);

    stats_mock.assert_async().await;
    snapshot_mock.assert_async().await;
}

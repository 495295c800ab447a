use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use coin_tracker_core::models::coin::{CachedCoin, Coin, ListSnapshot};
use coin_tracker_core::models::session::Session;
use coin_tracker_core::models::user::User;

fn coin(id: &str, name: &str, symbol: &str, price: f64) -> Coin {
    Coin::new(id, name, symbol, price)
}

// ═══════════════════════════════════════════════════════════════════
//  Coin
// ═══════════════════════════════════════════════════════════════════

mod coin_model {
    use super::*;

    #[test]
    fn new_sets_required_fields() {
        let c = coin("bitcoin", "Bitcoin", "BTC", 67_421.0);
        assert_eq!(c.id, "bitcoin");
        assert_eq!(c.name, "Bitcoin");
        assert_eq!(c.symbol, "BTC");
        assert_eq!(c.price, 67_421.0);
    }

    #[test]
    fn new_leaves_optionals_unset() {
        let c = coin("bitcoin", "Bitcoin", "BTC", 67_421.0);
        assert_eq!(c.rank, None);
        assert_eq!(c.market_cap, None);
        assert_eq!(c.change_24h, None);
    }

    #[test]
    fn serde_json_round_trip() {
        let c = Coin {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            symbol: "BTC".into(),
            price: 67_421.0,
            rank: Some(1),
            market_cap: Some(1_330_000_000_000.0),
            change_24h: Some(-2.35),
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: Coin = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn deserialize_without_optionals() {
        let json = r#"{"id": "bitcoin", "name": "Bitcoin", "symbol": "BTC", "price": 1.0}"#;
        let c: Coin = serde_json::from_str(json).unwrap();
        assert_eq!(c.rank, None);
        assert_eq!(c.market_cap, None);
        assert_eq!(c.change_24h, None);
    }

    #[test]
    fn bincode_round_trip() {
        let c = Coin {
            id: "ethereum".into(),
            name: "Ethereum".into(),
            symbol: "ETH".into(),
            price: 3_512.5,
            rank: Some(2),
            market_cap: None,
            change_24h: Some(1.72),
        };
        let bytes = bincode::serialize(&c).unwrap();
        let back: Coin = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, c);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ListSnapshot
// ═══════════════════════════════════════════════════════════════════

mod list_snapshot {
    use super::*;

    #[test]
    fn new_captures_fetch_time() {
        let before = Utc::now();
        let snapshot = ListSnapshot::new(vec![coin("bitcoin", "Bitcoin", "BTC", 1.0)]);
        let after = Utc::now();

        assert!(snapshot.fetched_at >= before);
        assert!(snapshot.fetched_at <= after);
    }

    #[test]
    fn keeps_coins_in_given_order() {
        let coins = vec![
            coin("solana", "Solana", "SOL", 188.25),
            coin("bitcoin", "Bitcoin", "BTC", 67_421.0),
        ];
        let snapshot = ListSnapshot::new(coins.clone());
        assert_eq!(snapshot.coins, coins);
    }

    #[test]
    fn fresh_within_ttl() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let snapshot = ListSnapshot {
            coins: vec![],
            fetched_at: now - Duration::minutes(30),
        };
        assert!(snapshot.is_fresh(now, Duration::hours(1)));
    }

    #[test]
    fn stale_past_ttl() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let snapshot = ListSnapshot {
            coins: vec![],
            fetched_at: now - Duration::hours(2),
        };
        assert!(!snapshot.is_fresh(now, Duration::hours(1)));
    }

    #[test]
    fn exactly_at_ttl_counts_as_stale() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let snapshot = ListSnapshot {
            coins: vec![],
            fetched_at: now - Duration::hours(1),
        };
        assert!(!snapshot.is_fresh(now, Duration::hours(1)));
    }

    #[test]
    fn zero_ttl_is_never_fresh() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let snapshot = ListSnapshot {
            coins: vec![],
            fetched_at: now,
        };
        assert!(!snapshot.is_fresh(now, Duration::zero()));
    }

    #[test]
    fn serde_round_trip_preserves_order_and_timestamp() {
        let snapshot = ListSnapshot::new(vec![
            coin("solana", "Solana", "SOL", 188.25),
            coin("bitcoin", "Bitcoin", "BTC", 67_421.0),
        ]);
        let bytes = bincode::serialize(&snapshot).unwrap();
        let back: ListSnapshot = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, snapshot);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  CachedCoin
// ═══════════════════════════════════════════════════════════════════

mod cached_coin {
    use super::*;

    #[test]
    fn new_captures_fetch_time() {
        let before = Utc::now();
        let record = CachedCoin::new(coin("bitcoin", "Bitcoin", "BTC", 1.0));
        assert!(record.fetched_at >= before);
        assert!(record.fetched_at <= Utc::now());
    }

    #[test]
    fn freshness_follows_ttl() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let record = CachedCoin {
            coin: coin("bitcoin", "Bitcoin", "BTC", 1.0),
            fetched_at: now - Duration::minutes(10),
        };
        assert!(record.is_fresh(now, Duration::hours(1)));
        assert!(!record.is_fresh(now, Duration::minutes(5)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Session
// ═══════════════════════════════════════════════════════════════════

mod session_model {
    use super::*;

    #[test]
    fn new_generates_distinct_tokens() {
        let user_id = Uuid::new_v4();
        let a = Session::new(user_id, None);
        let b = Session::new(user_id, None);
        assert!(!a.token.is_empty());
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn token_is_a_uuid_string() {
        let session = Session::new(Uuid::new_v4(), None);
        assert!(Uuid::parse_str(&session.token).is_ok());
    }

    #[test]
    fn without_ttl_there_is_no_expiry() {
        let session = Session::new(Uuid::new_v4(), None);
        assert!(session.expires_at.is_none());
        // Never expires, however far ahead we look
        let far_future = Utc::now() + Duration::days(10_000);
        assert!(!session.is_expired(far_future));
    }

    #[test]
    fn ttl_stamps_expiry_from_creation() {
        let session = Session::new(Uuid::new_v4(), Some(Duration::hours(8)));
        assert_eq!(
            session.expires_at.unwrap(),
            session.created_at + Duration::hours(8)
        );
    }

    #[test]
    fn not_expired_before_the_deadline() {
        let session = Session::new(Uuid::new_v4(), Some(Duration::hours(8)));
        assert!(!session.is_expired(session.created_at + Duration::hours(7)));
    }

    #[test]
    fn expired_at_and_after_the_deadline() {
        let session = Session::new(Uuid::new_v4(), Some(Duration::hours(8)));
        let deadline = session.expires_at.unwrap();
        assert!(session.is_expired(deadline));
        assert!(session.is_expired(deadline + Duration::seconds(1)));
    }

    #[test]
    fn serde_round_trip() {
        let session = Session::new(Uuid::new_v4(), Some(Duration::hours(1)));
        let bytes = bincode::serialize(&session).unwrap();
        let back: Session = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn deserialize_without_expiry_field() {
        // Records written before expiry tracking existed have no
        // expires_at; they read back as never-expiring
        let json = format!(
            r#"{{"user_id": "{}", "token": "tok", "created_at": "2025-06-01T12:00:00Z"}}"#,
            Uuid::new_v4()
        );
        let session: Session = serde_json::from_str(&json).unwrap();
        assert!(session.expires_at.is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  User
// ═══════════════════════════════════════════════════════════════════

mod user_model {
    use super::*;

    #[test]
    fn new_generates_distinct_ids() {
        let a = User::new("Ada", "ada@example.com", "$argon2id$stub");
        let b = User::new("Ada", "ada@example.com", "$argon2id$stub");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn new_sets_fields() {
        let before = Utc::now();
        let user = User::new("Ada", "ada@example.com", "$argon2id$stub");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.password_hash, "$argon2id$stub");
        assert!(user.created_at >= before);
    }

    #[test]
    fn serde_round_trip() {
        let user = User::new("Ada", "ada@example.com", "$argon2id$stub");
        let bytes = bincode::serialize(&user).unwrap();
        let back: User = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, user);
    }
}

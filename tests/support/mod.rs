// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup and distribution fixtures for integration tests.

use edgeflip::promote::{OriginPolicy, PromotionRequest, WatchConfig};
use edgeflip::types::{DistributionId, OriginId, ProjectName};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Once;
use std::time::Duration;

// Each test binary only uses some of these helpers, so allow dead_code.
#[allow(dead_code)]
pub mod http_stub;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("edgeflip=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// A CloudFront-shaped distribution config with two origins.
#[allow(dead_code)]
pub fn distribution_config() -> Value {
    json!({
        "CallerReference": "site-2023",
        "Aliases": { "Quantity": 1, "Items": ["www.example.com"] },
        "DefaultRootObject": "index.html",
        "Origins": {
            "Quantity": 2,
            "Items": [
                {
                    "Id": "O1",
                    "DomainName": "releases.s3.amazonaws.com",
                    "OriginPath": "/app/old",
                    "CustomHeaders": { "Quantity": 0 }
                },
                {
                    "Id": "api",
                    "DomainName": "api.example.com",
                    "OriginPath": "/v1"
                }
            ]
        },
        "DefaultCacheBehavior": { "TargetOriginId": "O1", "ViewerProtocolPolicy": "redirect-to-https" },
        "Comment": "",
        "Enabled": true
    })
}

#[allow(dead_code)]
pub fn prod_request(git_ref: &str, origin_id: &str) -> PromotionRequest {
    PromotionRequest {
        git_ref: git_ref.to_string(),
        distributions: HashMap::from([("prod".to_string(), DistributionId::new("DIST1"))]),
        origin_id: OriginId::new(origin_id),
        project: ProjectName::new("app").unwrap(),
        watch: WatchConfig {
            poll_interval: POLL_INTERVAL,
            max_wait: Duration::from_secs(20 * 60),
        },
        origin_policy: OriginPolicy::PassThrough,
    }
}

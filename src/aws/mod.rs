pub mod acm;
pub mod alb;
pub mod cloudfront;
pub mod elb;
pub mod iam;
pub mod session;

pub use acm::{AcmAdapter, AcmDescription};
pub use alb::AlbAdapter;
pub use cloudfront::{CloudFrontAdapter, DistributionDescription};
pub use elb::ElbAdapter;
pub use iam::{IamAdapter, IamDescription};
pub use session::{AwsSettings, Service};

use crate::rebind::CertificateBinding;

/// Paging flags shared by the list commands.
/// `max_items` limits the run to a single page starting at `marker`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub marker: Option<String>,
    pub max_items: Option<i32>,
}

impl Pagination {
    pub fn new(marker: Option<String>, max_items: Option<i32>) -> Self {
        Self {
            marker: marker.filter(|m| !m.is_empty()),
            max_items: max_items.filter(|n| *n > 0),
        }
    }
}

pub const LISTENER_TABLE_HEADERS: [&str; 3] = ["Name", "Port", "Listener SSL Certificate"];

/// Rows for `alb list` and `elb list`
pub fn listener_table_rows(bindings: &[CertificateBinding]) -> Vec<Vec<String>> {
    bindings
        .iter()
        .map(|b| {
            vec![
                b.resource.clone(),
                b.port().map(|p| p.to_string()).unwrap_or_default(),
                b.certificate.to_string(),
            ]
        })
        .collect()
}

//! AWS collaborators for orgflow
//!
//! This crate implements the orgflow-cloud collaborator traits on top of the
//! AWS SDK.
//!
//! # Features
//!
//! - Account creation and status lookup via AWS Organizations
//! - Account directory listing (paginated `ListAccounts`)
//! - NS delegation records in another account's Route 53 zone, through an
//!   STS-assumed role
//! - Root email verification via SES
//!
//! # Requirements
//!
//! - Credentials from the standard AWS chain (env vars, profile, or the
//!   execution role)
//! - A region, either from the environment or passed to [`AwsContext::load`]
//!
//! # Example
//!
//! ```ignore
//! use orgflow_cloud::{AccountLifecycleHandler, LifecycleHandler, LifecycleRequest};
//! use orgflow_cloud_aws::AwsContext;
//!
//! let context = AwsContext::load(Some("us-east-1")).await;
//! let handler = AccountLifecycleHandler::new(context.organizations());
//! let outcome = handler.on_event(&request).await?;
//! ```

pub mod context;
pub mod email;
pub mod error;
pub mod organizations;
pub mod route53;
pub mod sts;

pub use context::{AwsContext, partition_for_region};
pub use email::SesEmailVerification;
pub use error::{AwsError, Result};
pub use organizations::AwsOrganizations;
pub use route53::Route53Zone;
pub use sts::StsRoleAssumer;

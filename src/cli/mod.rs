// CLI Module
// Command line collaborator around the RSA core

pub mod app;

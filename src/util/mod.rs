// Utility Module
// File handling for payloads, ciphertext and key files

pub mod file_ops;

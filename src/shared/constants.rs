/// Prefix of the audit entry written after a reminder email goes out
pub const AUDIT_NOTIFICATION_SENT: &str = "Berhasil mengirim notifikasi kepada";

/// How the effective recipient of a notification is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecipientPolicy {
  /// Deliver to the address the caller asked for.
  #[default]
  Direct,
  /// Redirect to the sender when the domains differ. Sandboxed provider
  /// accounts can only deliver within the sender's own domain.
  SandboxSelfDelivery,
}

fn domain_of(address: &str) -> Option<&str> {
  address.rsplit_once('@').map(|(_, domain)| domain)
}

impl RecipientPolicy {
  pub fn resolve<'a>(&self, sender: &'a str, recipient: &'a str) -> &'a str {
    match self {
      RecipientPolicy::Direct => recipient,
      RecipientPolicy::SandboxSelfDelivery => {
        let sender_domain = domain_of(sender);
        let recipient_domain = domain_of(recipient);
        let same_domain = match (sender_domain, recipient_domain) {
          (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
          _ => false,
        };

        if same_domain {
          recipient
        } else {
          tracing::warn!(
            sender_domain = sender_domain.unwrap_or_default(),
            recipient_domain = recipient_domain.unwrap_or_default(),
            "Sender and recipient domains differ, delivering to {} instead",
            sender
          );
          sender
        }
      }
    }
  }
}

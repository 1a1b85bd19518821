//! Secret indirection: config only ever carries the *name* of a secret, the material is looked up
//! at the last moment.

use std::env;

use redact::Secret;

/// Reference to a secret living in the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef(String);

impl SecretRef {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn name(&self) -> &str {
		&self.0
	}

	/// Empty values count as unresolved.
	pub fn resolve<R: SecretResolver + ?Sized>(&self, resolver: &R) -> Option<Secret<String>> {
		resolver
			.lookup(&self.0)
			.filter(|value| !value.is_empty())
			.map(Secret::new)
	}
}

pub trait SecretResolver {
	fn lookup(&self, name: &str) -> Option<String>;
}

/// Resolves secrets from environment variables, typically mounted from a k8s `Secret`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvResolver;

impl SecretResolver for EnvResolver {
	fn lookup(&self, name: &str) -> Option<String> {
		env::var(name).ok()
	}
}

impl<F> SecretResolver for F
where
	F: Fn(&str) -> Option<String>,
{
	fn lookup(&self, name: &str) -> Option<String> {
		self(name)
	}
}

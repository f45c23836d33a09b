//! Role checks for restricted columns

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

use super::ColumnCatalog;

/// Decides whether the current actor may see a column.
///
/// Evaluated every time it is needed, never cached: swapping the check
/// (e.g. after a re-login) takes effect on the next restore or render.
pub trait RoleCheck: Send + Sync {
    /// Returns `true` if the column key is permitted for the actor.
    fn is_allowed(&self, column_key: &str) -> bool;
}

impl<F> RoleCheck for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_allowed(&self, column_key: &str) -> bool {
        self(column_key)
    }
}

/// Permits every column.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RoleCheck for AllowAll {
    fn is_allowed(&self, _column_key: &str) -> bool {
        true
    }
}

/// Set of roles that may see a column.
#[derive(Clone, PartialEq, Eq)]
pub struct RoleRestriction {
    allowed: HashSet<String>,
}

impl RoleRestriction {
    /// Permits actors holding at least one of the roles.
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if any of the actor's roles is allowed.
    pub fn permits<'a>(&self, roles: impl IntoIterator<Item = &'a str>) -> bool {
        roles.into_iter().any(|role| self.allowed.contains(role))
    }
}

impl fmt::Debug for RoleRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut roles: Vec<_> = self.allowed.iter().collect();
        roles.sort();
        f.debug_tuple("RoleRestriction").field(&roles).finish()
    }
}

/// Role check for an actor holding a fixed set of roles.
///
/// Built from a catalog snapshot; keys the catalog does not know are denied.
#[derive(Debug, Clone)]
pub struct ActorRoles {
    roles: HashSet<String>,
    restrictions: HashMap<String, Option<RoleRestriction>>,
}

impl ActorRoles {
    /// Creates a check for an actor with the given roles.
    pub fn new<I, S>(catalog: &ColumnCatalog, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            restrictions: catalog
                .iter()
                .map(|c| (c.key.clone(), c.restriction.clone()))
                .collect(),
        }
    }
}

impl RoleCheck for ActorRoles {
    fn is_allowed(&self, column_key: &str) -> bool {
        match self.restrictions.get(column_key) {
            Some(Some(restriction)) => restriction.permits(self.roles.iter().map(String::as_str)),
            Some(None) => true,
            None => false,
        }
    }
}

//! Route descriptors and path matching

use crate::auth::Role;

/// A declared client route. Child paths are relative to their parent
#[derive(Debug, Clone, Default)]
pub struct RouteDescriptor {
    pub path: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub required_role: Option<Role>,
    pub redirect: Option<String>,
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    pub fn redirect(mut self, to: &str) -> Self {
        self.redirect = Some(to.to_string());
        self
    }

    pub fn children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

/// A route flattened to its absolute path
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub required_role: Option<Role>,
    pub redirect: Option<String>,
}

/// Result of matching a path: the target record and its ancestors
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRoute {
    path: String,
    /// Outermost first, target excluded
    ancestors: Vec<RouteRecord>,
    target: RouteRecord,
}

impl MatchedRoute {
    /// The normalized path that was matched
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn into_path(self) -> String {
        self.path
    }

    /// The route the path resolved to
    pub fn target(&self) -> &RouteRecord {
        &self.target
    }

    pub fn ancestors(&self) -> &[RouteRecord] {
        &self.ancestors
    }

    /// Every matched record, outermost ancestor first and target last
    pub fn lineage(&self) -> impl Iterator<Item = &RouteRecord> {
        self.ancestors.iter().chain(std::iter::once(&self.target))
    }

    /// The target's own role, else the nearest ancestor's
    pub fn required_role(&self) -> Option<Role> {
        self.target
            .required_role
            .or_else(|| self.ancestors.iter().rev().find_map(|r| r.required_role))
    }

    pub fn title(&self) -> Option<&str> {
        self.target().title.as_deref()
    }
}

/// Flattened route tree
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    /// For each record, indices of its ancestors and itself, outermost first
    lineage: Vec<Vec<usize>>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        let mut table = Self {
            records: Vec::new(),
            lineage: Vec::new(),
        };
        for route in routes {
            table.add(route, "", &[]);
        }
        table
    }

    fn add(&mut self, route: RouteDescriptor, parent_path: &str, parents: &[usize]) {
        let path = join_path(parent_path, &route.path);
        let index = self.records.len();
        let mut lineage = parents.to_vec();
        lineage.push(index);

        self.records.push(RouteRecord {
            path: path.clone(),
            name: route.name,
            title: route.title,
            required_role: route.required_role,
            redirect: route.redirect,
        });
        self.lineage.push(lineage.clone());

        for child in route.children {
            self.add(child, &path, &lineage);
        }
    }

    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Match a path (query string and trailing slash ignored)
    pub fn resolve(&self, path: &str) -> Option<MatchedRoute> {
        let path = normalize(path);
        let index = self
            .records
            .iter()
            .position(|r| r.path == path)
            .or_else(|| self.records.iter().position(|r| matches_pattern(&r.path, &path)))?;

        let (_, ancestors) = self.lineage[index].split_last()?;
        Some(MatchedRoute {
            path,
            ancestors: ancestors.iter().map(|i| self.records[*i].clone()).collect(),
            target: self.records[index].clone(),
        })
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.records.iter().find(|r| r.name.as_deref() == Some(name))
    }
}

fn join_path(parent: &str, path: &str) -> String {
    if path.starts_with('/') {
        return normalize(path);
    }
    if parent.is_empty() || parent == "/" {
        return normalize(&format!("/{}", path));
    }
    normalize(&format!("{}/{}", parent, path))
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Segment-wise match where `:name` segments match anything
fn matches_pattern(pattern: &str, path: &str) -> bool {
    if !pattern.contains(':') {
        return false;
    }
    let pattern: Vec<&str> = pattern.split('/').collect();
    let path: Vec<&str> = path.split('/').collect();
    pattern.len() == path.len()
        && pattern
            .iter()
            .zip(&path)
            .all(|(p, s)| (p.starts_with(':') && !s.is_empty()) || p == s)
}

/// The MediCare+ route tree
pub fn default_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("/").name("home").title("Home"),
        RouteDescriptor::new("/login").name("UserLogin").title("User Login"),
        RouteDescriptor::new("/admin/login")
            .name("AdminLogin")
            .title("Admin Login"),
        RouteDescriptor::new("/doctor/login")
            .name("DoctorLogin")
            .title("Doctor Workstation Login"),
        RouteDescriptor::new("/user")
            .role(Role::User)
            .redirect("/user/dashboard")
            .children(vec![
                RouteDescriptor::new("dashboard")
                    .name("UserDashboard")
                    .title("Dashboard"),
                RouteDescriptor::new("ai-consult")
                    .name("AiConsult")
                    .title("AI Consultation"),
                RouteDescriptor::new("doctors").name("Doctors").title("Doctors"),
                RouteDescriptor::new("settings")
                    .name("UserSettings")
                    .title("Settings"),
            ]),
        RouteDescriptor::new("/doctor")
            .role(Role::Doctor)
            .redirect("/doctor/dashboard")
            .children(vec![RouteDescriptor::new("dashboard")
                .name("DoctorDashboard")
                .title("Doctor Dashboard")]),
        RouteDescriptor::new("/admin")
            .role(Role::Admin)
            .redirect("/admin/dashboard")
            .children(vec![RouteDescriptor::new("dashboard")
                .name("AdminDashboard")
                .title("Admin Dashboard")]),
    ]
}

use crate::department::Department;
use uuid::Uuid;

/// The acting user for one request, paired with the system owner whose courses
/// every user can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub acting_owner: Uuid,
    pub system_owner: Uuid,
}

impl Viewer {
    pub fn new(acting_owner: Uuid, system_owner: Uuid) -> Self {
        Self {
            acting_owner,
            system_owner,
        }
    }

    pub fn is_system(&self) -> bool {
        self.acting_owner == self.system_owner
    }

    /// Owners whose courses this viewer can see, own namespace first
    pub fn visible_owners(&self) -> Vec<Uuid> {
        if self.is_system() {
            vec![self.acting_owner]
        } else {
            vec![self.acting_owner, self.system_owner]
        }
    }

    pub fn can_view(&self, course_owner: Uuid) -> bool {
        course_owner == self.acting_owner || course_owner == self.system_owner
    }

    /// Whether this viewer may update or delete a course owned by `course_owner`
    ///
    /// System courses are read-only for everyone except the system owner itself.
    pub fn can_mutate(&self, course_owner: Uuid) -> bool {
        course_owner == self.acting_owner
            || (course_owner == self.system_owner && self.is_system())
    }
}

/// Optional narrowing applied to course listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    search: Option<String>,
    department: Option<Department>,
}

impl CourseFilter {
    /// Blank search terms impose no constraint
    pub fn new(search: Option<&str>, department: Option<Department>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        Self { search, department }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn department(&self) -> Option<Department> {
        self.department
    }
}

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Anyone,
    Authenticated,
    Admin,
    Owner,
    Mentor,
    Interested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Account,
    AccountDirectory,
    Announcement,
    Syllabus,
    Week,
    Submission,
    SubmissionAttachment,
    Document,
    Database,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Download,
    Submit,
    GiveFeedback,
    Export,
    Import,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
}

struct Rule {
    relation: Relation,
    resource: Resource,
    actions: &'static [Action],
}

const RULES: &[Rule] = &[
    Rule {
        relation: Relation::Anyone,
        resource: Resource::Announcement,
        actions: &[Action::View],
    },
    Rule {
        relation: Relation::Authenticated,
        resource: Resource::Document,
        actions: &[Action::Download],
    },
    Rule {
        relation: Relation::Owner,
        resource: Resource::Account,
        actions: &[Action::View, Action::Edit],
    },
    Rule {
        relation: Relation::Owner,
        resource: Resource::SubmissionAttachment,
        actions: &[Action::Download],
    },
    Rule {
        relation: Relation::Mentor,
        resource: Resource::Submission,
        actions: &[Action::View, Action::GiveFeedback],
    },
    Rule {
        relation: Relation::Mentor,
        resource: Resource::SubmissionAttachment,
        actions: &[Action::Download],
    },
    Rule {
        relation: Relation::Interested,
        resource: Resource::Week,
        actions: &[Action::View, Action::Submit],
    },
];

#[derive(Debug, Clone, Default)]
pub struct Viewer {
    relations: Vec<Relation>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self {
            relations: vec![Relation::Anyone],
        }
    }

    pub fn authenticated(admin: bool) -> Self {
        let mut viewer = Self::anonymous().with(Relation::Authenticated);
        if admin {
            viewer = viewer.with(Relation::Admin);
        }
        viewer
    }

    #[must_use]
    pub fn with(mut self, relation: Relation) -> Self {
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
        self
    }

    #[must_use]
    pub fn with_if(self, condition: bool, relation: Relation) -> Self {
        if condition { self.with(relation) } else { self }
    }

    pub fn has(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }
}

pub fn allows(viewer: &Viewer, resource: Resource, action: Action) -> bool {
    if viewer.has(Relation::Admin) {
        return true;
    }

    RULES.iter().any(|rule| {
        rule.resource == resource && rule.actions.contains(&action) && viewer.has(rule.relation)
    })
}

pub fn authorize(viewer: &Viewer, resource: Resource, action: Action) -> Result<(), AccessDenied> {
    if allows(viewer, resource, action) {
        Ok(())
    } else if viewer.has(Relation::Authenticated) {
        Err(AccessDenied::Forbidden)
    } else {
        Err(AccessDenied::Unauthenticated)
    }
}

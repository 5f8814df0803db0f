// src/services/visibility.rs

//! Filtro de visibilidade por papel. Gestores e superadmin veem tudo da empresa;
//! papéis de campo só veem registros das sahalar/santraller atribuídas.

use uuid::Uuid;

use crate::models::{
    asset::InventoryAsset,
    auth::{Role, User},
    fault::Fault,
    maintenance::{MaintenanceRecord, WorkReport},
    outage::PowerOutage,
    shift::ShiftReport,
    site::{PowerPlant, Site},
    stock::StockItem,
};

pub trait SiteScoped {
    fn site_id(&self) -> Option<Uuid>;
    fn plant_id(&self) -> Option<Uuid>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPolicy {
    /// Visível se a saha OU a santral estiver atribuída.
    AnyAssigned,
    /// Filtra por santral se houver; senão por saha; senão não filtra.
    PlantsFirst,
}

#[derive(Debug, Clone, Copy)]
pub struct Viewer<'a> {
    pub role: Role,
    pub sites: &'a [Uuid],
    pub plants: &'a [Uuid],
}

impl<'a> From<&'a User> for Viewer<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            role: user.role,
            sites: &user.sites,
            plants: &user.plants,
        }
    }
}

impl Viewer<'_> {
    pub fn can_see<T: SiteScoped>(&self, record: &T, policy: VisibilityPolicy) -> bool {
        if !self.role.is_restricted() {
            return true;
        }

        let site_match = record.site_id().is_some_and(|id| self.sites.contains(&id));
        let plant_match = record.plant_id().is_some_and(|id| self.plants.contains(&id));

        match policy {
            VisibilityPolicy::AnyAssigned => site_match || plant_match,
            VisibilityPolicy::PlantsFirst => {
                if !self.plants.is_empty() {
                    plant_match
                } else if !self.sites.is_empty() {
                    site_match
                } else {
                    true
                }
            }
        }
    }
}

pub fn filter_visible<T: SiteScoped>(records: Vec<T>, viewer: &Viewer<'_>, policy: VisibilityPolicy) -> Vec<T> {
    if !viewer.role.is_restricted() {
        return records;
    }
    records.into_iter().filter(|r| viewer.can_see(r, policy)).collect()
}

macro_rules! site_scoped {
    ($ty:ty, |$r:ident| $site:expr, $plant:expr) => {
        #[allow(unused_variables)]
        impl SiteScoped for $ty {
            fn site_id(&self) -> Option<Uuid> {
                let $r = self;
                $site
            }
            fn plant_id(&self) -> Option<Uuid> {
                let $r = self;
                $plant
            }
        }
    };
}

site_scoped!(Fault, |r| r.site_id, r.plant_id);
site_scoped!(MaintenanceRecord, |r| r.site_id, r.plant_id);
site_scoped!(WorkReport, |r| r.site_id, r.plant_id);
site_scoped!(PowerOutage, |r| Some(r.site_id), r.plant_id);
site_scoped!(StockItem, |r| r.site_id, r.plant_id);
site_scoped!(ShiftReport, |r| Some(r.site_id), r.plant_id);
site_scoped!(InventoryAsset, |r| Some(r.site_id), r.plant_id);
site_scoped!(Site, |r| Some(r.id), None);
site_scoped!(PowerPlant, |r| Some(r.site_id), Some(r.id));

#[cfg(test)]
mod tests {
    use super::*;

    struct Rec(Option<Uuid>, Option<Uuid>);

    impl SiteScoped for Rec {
        fn site_id(&self) -> Option<Uuid> {
            self.0
        }
        fn plant_id(&self) -> Option<Uuid> {
            self.1
        }
    }

    #[test]
    fn managers_see_everything() {
        let viewer = Viewer { role: Role::Manager, sites: &[], plants: &[] };
        let records = vec![Rec(None, None), Rec(Some(Uuid::new_v4()), None)];
        assert_eq!(filter_visible(records, &viewer, VisibilityPolicy::AnyAssigned).len(), 2);
    }

    #[test]
    fn any_assigned_matches_site_or_plant() {
        let (s1, s2, p1, p2) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let sites = [s1];
        let plants = [p2];
        let viewer = Viewer { role: Role::Technician, sites: &sites, plants: &plants };

        assert!(viewer.can_see(&Rec(Some(s1), Some(p1)), VisibilityPolicy::AnyAssigned));
        assert!(viewer.can_see(&Rec(Some(s2), Some(p2)), VisibilityPolicy::AnyAssigned));
        assert!(!viewer.can_see(&Rec(Some(s2), Some(p1)), VisibilityPolicy::AnyAssigned));
        assert!(!viewer.can_see(&Rec(None, None), VisibilityPolicy::AnyAssigned));
    }

    #[test]
    fn any_assigned_with_no_assignments_hides_everything() {
        let viewer = Viewer { role: Role::Customer, sites: &[], plants: &[] };
        let records = vec![Rec(Some(Uuid::new_v4()), Some(Uuid::new_v4()))];
        assert!(filter_visible(records, &viewer, VisibilityPolicy::AnyAssigned).is_empty());
    }

    #[test]
    fn plants_first_prefers_plant_assignments() {
        let (s1, p1, p2) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let sites = [s1];
        let plants = [p1];
        let viewer = Viewer { role: Role::Engineer, sites: &sites, plants: &plants };

        assert!(viewer.can_see(&Rec(None, Some(p1)), VisibilityPolicy::PlantsFirst));
        // saha atribuída não basta quando há santraller
        assert!(!viewer.can_see(&Rec(Some(s1), Some(p2)), VisibilityPolicy::PlantsFirst));
    }

    #[test]
    fn plants_first_falls_back_to_sites_then_to_everything() {
        let (s1, s2) = (Uuid::new_v4(), Uuid::new_v4());
        let sites = [s1];
        let by_site = Viewer { role: Role::Guard, sites: &sites, plants: &[] };
        assert!(by_site.can_see(&Rec(Some(s1), None), VisibilityPolicy::PlantsFirst));
        assert!(!by_site.can_see(&Rec(Some(s2), None), VisibilityPolicy::PlantsFirst));

        let unassigned = Viewer { role: Role::Guard, sites: &[], plants: &[] };
        assert!(unassigned.can_see(&Rec(None, None), VisibilityPolicy::PlantsFirst));
    }

    #[test]
    fn plants_are_visible_through_their_site() {
        let site_id = Uuid::new_v4();
        let plant = PowerPlant {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id,
            name: "GES-1".into(),
            capacity_kw: Default::default(),
            created_at: chrono::Utc::now(),
        };
        let sites = [site_id];
        let viewer = Viewer { role: Role::Customer, sites: &sites, plants: &[] };
        assert!(viewer.can_see(&plant, VisibilityPolicy::AnyAssigned));
    }
}

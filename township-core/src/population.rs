use std::ops::{Index, IndexMut};

use slotmap::SlotMap;

use crate::resident::Resident;
use crate::types::ResidentId;

/// Exclusive owner of every living resident.
///
/// Residents are stored in a slotmap so partner back-references stay valid
/// handles, while `order` keeps insertion order. Every engine that iterates
/// the population walks `order`; tier and triage ordering depend on it.
#[derive(Debug, Clone, Default)]
pub struct Population {
    residents: SlotMap<ResidentId, Resident>,
    order: Vec<ResidentId>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append a resident at the end of the population order.
    pub fn push(&mut self, resident: Resident) -> ResidentId {
        let id = self.residents.insert(resident);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: ResidentId) -> Option<&Resident> {
        self.residents.get(id)
    }

    pub fn get_mut(&mut self, id: ResidentId) -> Option<&mut Resident> {
        self.residents.get_mut(id)
    }

    pub fn contains(&self, id: ResidentId) -> bool {
        self.residents.contains_key(id)
    }

    /// Handles in population order.
    pub fn ids(&self) -> &[ResidentId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResidentId, &Resident)> + '_ {
        self.order.iter().map(|&id| (id, &self.residents[id]))
    }

    pub fn residents(&self) -> impl Iterator<Item = &Resident> + '_ {
        self.order.iter().map(|&id| &self.residents[id])
    }

    /// Visit every resident mutably, in population order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(ResidentId, &mut Resident)) {
        for &id in &self.order {
            f(id, &mut self.residents[id]);
        }
    }

    pub fn count(&self, pred: impl Fn(&Resident) -> bool) -> usize {
        self.residents().filter(|r| pred(r)).count()
    }

    /// Make `a` and `b` each other's partner.
    pub fn link(&mut self, a: ResidentId, b: ResidentId) {
        debug_assert_ne!(a, b);
        self.residents[a].partner = Some(b);
        self.residents[b].partner = Some(a);
    }

    /// Remove a resident, clearing the surviving partner's back-reference.
    pub fn remove(&mut self, id: ResidentId) -> Option<Resident> {
        let resident = self.residents.remove(id)?;
        self.order.retain(|&other| other != id);

        if let Some(partner) = resident.partner {
            if let Some(p) = self.residents.get_mut(partner) {
                if p.partner == Some(id) {
                    p.partner = None;
                }
            }
        }

        debug_assert!(self.partners_consistent());
        Some(resident)
    }

    /// Every partner reference points at a living resident that points back.
    pub fn partners_consistent(&self) -> bool {
        self.iter().all(|(id, r)| match r.partner {
            None => true,
            Some(p) => self
                .residents
                .get(p)
                .is_some_and(|other| other.partner == Some(id)),
        })
    }
}

impl Index<ResidentId> for Population {
    type Output = Resident;

    fn index(&self, id: ResidentId) -> &Resident {
        &self.residents[id]
    }
}

impl IndexMut<ResidentId> for Population {
    fn index_mut(&mut self, id: ResidentId) -> &mut Resident {
        &mut self.residents[id]
    }
}

impl FromIterator<Resident> for Population {
    fn from_iter<I: IntoIterator<Item = Resident>>(iter: I) -> Self {
        let mut population = Population::new();
        for resident in iter {
            population.push(resident);
        }
        population
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Job, Persona, Position};

    fn adult() -> Resident {
        Resident::new(30, Job::Worker, Persona::Normal, Position::default())
    }

    #[test]
    fn order_survives_removal() {
        let mut pop = Population::new();
        let a = pop.push(adult());
        let b = pop.push(adult());
        let c = pop.push(adult());

        pop.remove(b);
        assert_eq!(pop.ids(), &[a, c]);

        // Freed slot may be reused, but the newcomer still goes last
        let d = pop.push(adult());
        assert_eq!(pop.ids(), &[a, c, d]);
    }

    #[test]
    fn removal_clears_partner() {
        let mut pop = Population::new();
        let a = pop.push(adult());
        let b = pop.push(adult());
        pop.link(a, b);
        assert!(pop.partners_consistent());

        pop.remove(a);
        assert_eq!(pop[b].partner, None);
        assert!(pop.partners_consistent());
    }

    #[test]
    fn stale_handle_does_not_resolve() {
        let mut pop = Population::new();
        let a = pop.push(adult());
        pop.remove(a);
        assert!(!pop.contains(a));
        assert!(pop.get(a).is_none());
        assert!(pop.remove(a).is_none());
    }
}

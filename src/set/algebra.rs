//! Set algebra over [`BlobSet`]
//!
//! Everything here is expressed with insert/contains/retain, so growth
//! and shrink follow the usual table policy.

use crate::error::Result;

use super::BlobSet;

impl BlobSet {
    /// New set holding every blob of `self` or `other`
    ///
    /// Seeded with `other`'s blobs first, then `self`'s.
    pub fn union(&self, other: &BlobSet) -> Result<BlobSet> {
        let mut out = BlobSet::with_capacity(self.capacity().max(other.capacity()))?;
        out.unionize(other)?;
        out.unionize(self)?;
        Ok(out)
    }

    /// New set holding the blobs present in both sets
    pub fn intersection(&self, other: &BlobSet) -> Result<BlobSet> {
        let mut out = BlobSet::with_capacity(self.capacity())?;
        for blob in self.iter().filter(|blob| other.contains(blob)) {
            out.insert(blob)?;
        }
        Ok(out)
    }

    /// New set holding the blobs of `self` absent from `other`
    pub fn difference(&self, other: &BlobSet) -> Result<BlobSet> {
        let mut out = BlobSet::with_capacity(self.capacity())?;
        for blob in self.iter().filter(|blob| !other.contains(blob)) {
            out.insert(blob)?;
        }
        Ok(out)
    }

    /// Insert every blob of `other` into `self`
    ///
    /// Stops at the first allocation failure; blobs inserted before it
    /// stay in the set.
    pub fn unionize(&mut self, other: &BlobSet) -> Result<()> {
        for blob in other.iter() {
            self.insert(blob)?;
        }
        Ok(())
    }

    /// Remove from `self` every blob absent from `other`
    pub fn intersect(&mut self, other: &BlobSet) {
        self.retain(|blob| other.contains(blob));
    }

    /// Remove from `self` every blob present in `other`
    pub fn subtract(&mut self, other: &BlobSet) {
        self.retain(|blob| !other.contains(blob));
    }

    /// Whether every blob of `self` is also in `other`
    pub fn is_subset(&self, other: &BlobSet) -> bool {
        self.len() <= other.len() && self.iter().all(|blob| other.contains(blob))
    }

    /// Same blobs in both sets, regardless of capacity or placement
    pub fn equals(&self, other: &BlobSet) -> bool {
        self.len() == other.len() && self.is_subset(other) && other.is_subset(self)
    }
}

impl PartialEq for BlobSet {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for BlobSet {}

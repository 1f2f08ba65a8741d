use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::read_commit;
use crate::repo::Repo;

/// nearest common ancestor of two commits in the stored graph
pub fn merge_base(repo: &Repo, a: Hash, b: Hash) -> Result<Hash> {
    find_merge_base(a, b, |hash| Ok(read_commit(repo, hash)?.parents))
}

/// nearest common ancestor of `a` and `b` over all parent links
///
/// walks backwards from both commits recording distances. among commits
/// reached from both, those that are a parent of another such commit are
/// dropped; the rest are ranked by (max distance, total distance, hash).
pub fn find_merge_base<F>(a: Hash, b: Hash, mut parents_of: F) -> Result<Hash>
where
    F: FnMut(&Hash) -> Result<Vec<Hash>>,
{
    let mut parents: HashMap<Hash, Vec<Hash>> = HashMap::new();
    let from_a = distances(a, &mut parents, &mut parents_of)?;
    let from_b = distances(b, &mut parents, &mut parents_of)?;

    let common: HashSet<Hash> = from_a
        .keys()
        .filter(|h| from_b.contains_key(*h))
        .copied()
        .collect();

    // a common commit that is a parent of another is never the nearest
    let shadowed: HashSet<Hash> = common
        .iter()
        .filter_map(|h| parents.get(h))
        .flatten()
        .copied()
        .collect();

    common
        .iter()
        .filter(|h| !shadowed.contains(*h))
        .map(|h| {
            let (da, db) = (from_a[h], from_b[h]);
            ((da.max(db), da + db, *h), *h)
        })
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, h)| h)
        .ok_or(Error::NoCommonAncestor(a, b))
}

/// breadth-first distances from `start` to every ancestor
fn distances<F>(
    start: Hash,
    cache: &mut HashMap<Hash, Vec<Hash>>,
    parents_of: &mut F,
) -> Result<HashMap<Hash, usize>>
where
    F: FnMut(&Hash) -> Result<Vec<Hash>>,
{
    let mut dist = HashMap::new();
    let mut queue = VecDeque::new();
    dist.insert(start, 0);
    queue.push_back(start);

    while let Some(hash) = queue.pop_front() {
        let d = dist[&hash];
        if !cache.contains_key(&hash) {
            let ps = parents_of(&hash)?;
            cache.insert(hash, ps);
        }
        for parent in &cache[&hash] {
            if !dist.contains_key(parent) {
                dist.insert(*parent, d + 1);
                queue.push_back(*parent);
            }
        }
    }

    Ok(dist)
}

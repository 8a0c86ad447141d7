use rand::Rng;

use crate::catalog::Catalog;
use crate::roster::{Agent, Player};
use crate::{LobbyError, Result};

/// Return a uniformly shuffled copy of `items` (Fisher-Yates). The input is
/// left as it was.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    let mut i = out.len();
    while i > 1 {
        i -= 1;
        let j = rng.gen_range(0..=i);
        if j != i {
            out.swap(i, j);
        }
    }
    out
}

/// Give every player on one team a fresh agent.
///
/// One player picked at random gets an area-denial agent; the rest are
/// served in roster order from a single shuffled pass over the other agents,
/// so nobody on the team shares an agent. Fails up front when the catalog
/// cannot cover the team.
pub fn randomize_team_agents<R: Rng + ?Sized>(
    players: &[Player],
    catalog: &Catalog,
    rng: &mut R,
) -> Result<Vec<Player>> {
    if players.is_empty() {
        return Ok(Vec::new());
    }

    let others: Vec<&String> = catalog.non_area_denial().collect();
    let needed = players.len() - 1;
    if others.len() < needed || catalog.area_denial().is_empty() {
        return Err(LobbyError::UnsatisfiableAssignment {
            players: players.len(),
            available: others.len(),
        });
    }

    let smokes = shuffle(catalog.area_denial(), rng);
    let smoke = &smokes[0];
    let smoker = rng.gen_range(0..players.len());

    let mut remaining = shuffle(&others, rng).into_iter();

    let mut out = Vec::with_capacity(players.len());
    for (idx, player) in players.iter().enumerate() {
        let agent = if idx == smoker {
            smoke.clone()
        } else {
            // capacity was checked above
            match remaining.next() {
                Some(agent) => agent.clone(),
                None => {
                    return Err(LobbyError::UnsatisfiableAssignment {
                        players: players.len(),
                        available: others.len(),
                    })
                }
            }
        };
        out.push(Player {
            agent: Agent::Named(agent),
            ..player.clone()
        });
    }

    Ok(out)
}

/// Pick one map uniformly at random.
pub fn randomize_map<'a, R: Rng + ?Sized>(maps: &'a [String], rng: &mut R) -> Result<&'a str> {
    if maps.is_empty() {
        return Err(LobbyError::NoMaps);
    }
    Ok(&maps[rng.gen_range(0..maps.len())])
}

//! Fixed aggregation pipelines, one per analytical endpoint.
//!
//! Each function returns the ordered stages only; running them is the
//! connection manager's job. Field names in the output documents are part of
//! the HTTP contract, so change them with care.

use mongodb::bson::{Document, doc};

use super::PLAYERS;

/// Number of players returned by [`oldest_players`].
pub const OLDEST_PLAYERS_LIMIT: i64 = 5;

/// Minimum number of matches (exclusive) for the "more than 10" endpoints.
pub const MATCH_COUNT_THRESHOLD: i64 = 10;

/// `[{ totalPlayers }]` over `players`. Emits nothing for an empty collection.
pub fn total_players() -> Vec<Document> {
    vec![doc! { "$count": "totalPlayers" }]
}

/// `[{ _id: team, averageAge }]` over `players`.
pub fn average_age_by_team() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": "$team",
            "averageAge": { "$avg": "$age" }
        }
    }]
}

/// `[{ name, team, position }]` over `players`, without `_id`.
pub fn players_with_team() -> Vec<Document> {
    vec![doc! {
        "$project": { "_id": 0, "name": 1, "team": 1, "position": 1 }
    }]
}

/// Full player documents, oldest first, at most [`OLDEST_PLAYERS_LIMIT`].
pub fn oldest_players() -> Vec<Document> {
    vec![
        doc! { "$sort": { "age": -1 } },
        doc! { "$limit": OLDEST_PLAYERS_LIMIT },
    ]
}

/// A single `{ homeGames, awayGames }` document over `matches`.
pub fn total_matches() -> Vec<Document> {
    vec![doc! {
        "$facet": {
            "homeGames": [
                { "$group": { "_id": "$home_team", "totalHomeGames": { "$sum": 1 } } }
            ],
            "awayGames": [
                { "$group": { "_id": "$away_team", "totalAwayGames": { "$sum": 1 } } }
            ]
        }
    }]
}

/// `[{ _id: team, wins }]` over `matches`, counting home wins only.
///
/// A team that only ever wins away does not appear at all.
pub fn wins_per_team() -> Vec<Document> {
    vec![
        doc! { "$match": { "$expr": { "$gt": ["$home_score", "$away_score"] } } },
        doc! { "$group": { "_id": "$home_team", "wins": { "$sum": 1 } } },
    ]
}

/// `[{ _id: home_team, totalHomeScore, totalAwayScore }]` over `matches`.
pub fn total_score_by_team() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": "$home_team",
            "totalHomeScore": { "$sum": "$home_score" },
            "totalAwayScore": { "$sum": "$away_score" }
        }
    }]
}

// Joins each match to every player of the home team.
fn home_players_join() -> [Document; 2] {
    [
        doc! {
            "$lookup": {
                "from": PLAYERS,
                "localField": "home_team",
                "foreignField": "team",
                "as": "homePlayers"
            }
        },
        doc! { "$unwind": "$homePlayers" },
    ]
}

/// `[{ _id: player name, matchCount }]` for players whose team hosted more
/// than [`MATCH_COUNT_THRESHOLD`] matches. Away appearances are not counted.
pub fn players_more_than_10_matches() -> Vec<Document> {
    let mut pipeline = home_players_join().to_vec();
    pipeline.push(doc! { "$group": { "_id": "$homePlayers.name", "matchCount": { "$sum": 1 } } });
    pipeline.push(doc! { "$match": { "matchCount": { "$gt": MATCH_COUNT_THRESHOLD } } });
    pipeline
}

/// `[{ _id: player name, totalGoals }]`, the single best "scorer".
///
/// There is no per-player scoring data, so every home player is credited
/// with the whole home score of each match. Ties resolve by name.
pub fn most_scored_player() -> Vec<Document> {
    let mut pipeline = home_players_join().to_vec();
    pipeline.push(doc! {
        "$group": { "_id": "$homePlayers.name", "totalGoals": { "$sum": "$home_score" } }
    });
    pipeline.push(doc! { "$sort": { "totalGoals": -1, "_id": 1 } });
    pipeline.push(doc! { "$limit": 1 });
    pipeline
}

/// `[{ _id: "A-B", matchCount }]` for team pairings with more than
/// [`MATCH_COUNT_THRESHOLD`] matches.
///
/// The key puts the lexicographically smaller team first, so `A` hosting `B`
/// and `B` hosting `A` count towards the same pairing.
pub fn teams_more_than_10_matches() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": {
                    "$cond": [
                        { "$lte": ["$home_team", "$away_team"] },
                        { "$concat": ["$home_team", "-", "$away_team"] },
                        { "$concat": ["$away_team", "-", "$home_team"] }
                    ]
                },
                "matchCount": { "$sum": 1 }
            }
        },
        doc! { "$match": { "matchCount": { "$gt": MATCH_COUNT_THRESHOLD } } },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_names(pipeline: &[Document]) -> Vec<&str> {
        pipeline
            .iter()
            .map(|stage| stage.keys().next().map(String::as_str).unwrap_or_default())
            .collect()
    }

    #[test]
    fn total_players_counts_into_total_players() {
        let pipeline = total_players();
        assert_eq!(pipeline, vec![doc! { "$count": "totalPlayers" }]);
    }

    #[test]
    fn players_with_team_drops_id() {
        let pipeline = players_with_team();
        let projection = pipeline[0].get_document("$project").unwrap();
        assert_eq!(projection.get_i32("_id").unwrap(), 0);
        for field in ["name", "team", "position"] {
            assert_eq!(projection.get_i32(field).unwrap(), 1);
        }
        assert!(!projection.contains_key("age"));
    }

    #[test]
    fn oldest_players_sorts_before_limiting() {
        let pipeline = oldest_players();
        assert_eq!(stage_names(&pipeline), ["$sort", "$limit"]);
        assert_eq!(pipeline[0].get_document("$sort").unwrap().get_i32("age").unwrap(), -1);
        assert_eq!(pipeline[1].get_i64("$limit").unwrap(), 5);
    }

    #[test]
    fn total_matches_has_both_facets() {
        let pipeline = total_matches();
        let facet = pipeline[0].get_document("$facet").unwrap();
        assert!(facet.get_array("homeGames").is_ok());
        assert!(facet.get_array("awayGames").is_ok());
    }

    #[test]
    fn wins_filter_before_grouping() {
        assert_eq!(stage_names(&wins_per_team()), ["$match", "$group"]);
    }

    #[test]
    fn home_join_pipelines_share_prefix() {
        for pipeline in [players_more_than_10_matches(), most_scored_player()] {
            let names = stage_names(&pipeline);
            assert_eq!(&names[..3], ["$lookup", "$unwind", "$group"]);
            let lookup = pipeline[0].get_document("$lookup").unwrap();
            assert_eq!(lookup.get_str("from").unwrap(), PLAYERS);
            assert_eq!(lookup.get_str("localField").unwrap(), "home_team");
            assert_eq!(lookup.get_str("foreignField").unwrap(), "team");
        }
    }

    #[test]
    fn most_scored_player_returns_one_deterministic_row() {
        let pipeline = most_scored_player();
        assert_eq!(
            stage_names(&pipeline),
            ["$lookup", "$unwind", "$group", "$sort", "$limit"]
        );
        let sort = pipeline[3].get_document("$sort").unwrap();
        assert_eq!(sort.keys().collect::<Vec<_>>(), ["totalGoals", "_id"]);
        assert_eq!(pipeline[4].get_i32("$limit").unwrap(), 1);
    }

    #[test]
    fn threshold_is_strictly_greater_than_ten() {
        for pipeline in [players_more_than_10_matches(), teams_more_than_10_matches()] {
            let last = pipeline.last().unwrap();
            let filter = last.get_document("$match").unwrap();
            let count = filter.get_document("matchCount").unwrap();
            assert_eq!(count.get_i64("$gt").unwrap(), 10);
        }
    }

    #[test]
    fn team_pairing_key_is_order_normalized() {
        let pipeline = teams_more_than_10_matches();
        let key = pipeline[0]
            .get_document("$group")
            .unwrap()
            .get_document("_id")
            .unwrap();
        let branches = key.get_array("$cond").unwrap();
        assert_eq!(branches.len(), 3);
        assert_eq!(
            branches[1].as_document().unwrap(),
            &doc! { "$concat": ["$home_team", "-", "$away_team"] }
        );
        assert_eq!(
            branches[2].as_document().unwrap(),
            &doc! { "$concat": ["$away_team", "-", "$home_team"] }
        );
    }
}

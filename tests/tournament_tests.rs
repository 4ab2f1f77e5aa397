use fencing_swiss::{
    Competition, Fencer, Gender, Match, ParticipantKey, ParticipantKind, Score, SwissConfig,
    SwissError, Team,
};
use std::collections::BTreeSet;

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn individual_competition(names: &[&str], maximum_score: u32) -> Competition {
        let config = SwissConfig {
            name: "Challenge du dimanche".to_string(),
            maximum_score,
            ..SwissConfig::default()
        };
        let mut competition = Competition::new(config).unwrap();
        for (i, name) in names.iter().enumerate() {
            let fencer = Fencer::new(*name, "Test", Gender::Male, 18 + i as u32).unwrap();
            competition.add_participant(fencer).unwrap();
        }
        competition
    }

    fn seats(matches: &[Match]) -> Vec<(usize, Option<usize>)> {
        matches
            .iter()
            .map(|m| (m.participant1().unwrap().index, m.participant2().map(|e| e.index)))
            .collect()
    }

    /// Seat one wins every bout `winner`-`loser`.
    fn play_round(competition: &mut Competition, matches: &mut [Match], winner: u32, loser: u32) {
        for bout in matches.iter_mut().filter(|m| !m.is_bye()) {
            competition
                .enter_scores(bout, Score::new(winner, None), Score::new(loser, None))
                .unwrap();
        }
        competition.close_round(matches).unwrap();
    }

    #[test]
    fn test_five_fencers_two_rounds() {
        init_logger();
        let mut competition =
            individual_competition(&["ALBERT", "BLANC", "COLIN", "DENIS", "ETIENNE"], 5);

        let mut round1 = competition.next_round().unwrap();
        assert_eq!(
            seats(&round1),
            vec![(0, Some(3)), (1, Some(2)), (4, None)]
        );
        play_round(&mut competition, &mut round1, 5, 3);

        let victories: Vec<f32> = competition
            .participants()
            .iter()
            .map(|p| p.standing().unwrap().victories())
            .collect();
        assert_eq!(victories, vec![1.0, 1.0, 0.0, 0.0, 1.0]);
        assert!(competition.participants()[4]
            .standing()
            .unwrap()
            .has_been_exempted());

        // the exempted fencer floats into the losers' bracket, the last loser sits out
        let mut round2 = competition.next_round().unwrap();
        assert_eq!(
            seats(&round2),
            vec![(0, Some(1)), (4, Some(2)), (3, None)]
        );
        play_round(&mut competition, &mut round2, 5, 1);
        assert_eq!(competition.rounds_played(), 2);

        let standings = competition.standings();
        assert_eq!(standings[0].0, 1);
        assert_eq!(standings[0].1.key().to_string(), "ALBERT Test");
        assert_eq!(standings[0].1.standing().unwrap().victories(), 2.0);
    }

    #[test]
    fn test_rounds_never_repeat_an_encounter() {
        init_logger();
        let names = [
            "ARNAUD", "BRUN", "CHEVALIER", "DUMONT", "FABRE", "GIRARD", "HENRY", "JOLY", "LEROY",
        ];
        let mut competition = individual_competition(&names, 15);

        let mut met: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut exempted: Vec<usize> = Vec::new();

        for round in 0..4u32 {
            let mut matches = competition.next_round().unwrap();
            assert_eq!(matches.len(), names.len() / 2 + 1);

            let mut seen = BTreeSet::new();
            for (a, b) in seats(&matches) {
                assert!(seen.insert(a), "participant {a} seated twice");
                match b {
                    Some(b) => {
                        assert!(seen.insert(b), "participant {b} seated twice");
                        assert!(met.insert((a.min(b), a.max(b))), "{a} and {b} met again");
                    }
                    None => exempted.push(a),
                }
            }
            assert_eq!(seen.len(), names.len());

            play_round(&mut competition, &mut matches, 5 + round, 2);
        }

        let distinct: BTreeSet<usize> = exempted.iter().copied().collect();
        assert_eq!(exempted.len(), 4);
        assert_eq!(distinct.len(), 4, "a participant got two byes: {exempted:?}");

        let total: f32 = competition
            .participants()
            .iter()
            .map(|p| p.standing().unwrap().victories())
            .sum();
        assert_eq!(total, 4.0 * 5.0);
    }

    #[test]
    fn test_team_competition() {
        init_logger();
        let config = SwissConfig {
            kind: ParticipantKind::Team,
            maximum_score: 45,
            draws_allowed: false,
            ..SwissConfig::default()
        };
        let mut competition = Competition::new(config).unwrap();

        for (t, name) in ["Alpha", "Bravo", "Charlie", "Delta"].iter().enumerate() {
            let mut team = Team::new(*name).unwrap();
            for m in 0..3 {
                let member = Fencer::new(format!("{name}{m}"), "Membre", Gender::Female, 20 + t as u32)
                    .unwrap()
                    .into_team_member();
                team.add_fencer(member).unwrap();
            }
            competition.add_participant(team).unwrap();
        }

        let loose = Fencer::new("SEUL", "Solo", Gender::Male, 30).unwrap();
        assert!(matches!(
            competition.add_participant(loose),
            Err(SwissError::InvalidValue(_))
        ));

        let mut round1 = competition.next_round().unwrap();
        assert_eq!(seats(&round1), vec![(0, Some(3)), (1, Some(2))]);
        play_round(&mut competition, &mut round1, 45, 38);

        let round2 = competition.next_round().unwrap();
        assert_eq!(seats(&round2), vec![(0, Some(1)), (2, Some(3))]);

        let alpha = &competition.participants()[0];
        assert_eq!(alpha.standing().unwrap().touches_scored(), 45);
        assert!(alpha
            .standing()
            .unwrap()
            .has_encountered(&ParticipantKey::Team { name: "Delta".to_string() }));
        if let fencing_swiss::Participant::Team(team) = alpha {
            assert_eq!(team.members().len(), 3);
            assert!(team.members().iter().all(|m| m.standing().is_none()));
        } else {
            panic!("expected a team");
        }
    }

    #[test]
    fn test_competition_from_json_config() {
        init_logger();
        let config = SwissConfig::from_json(
            r#"{
                "name": "Open de Lille",
                "weapon": "Foil",
                "division": "Women",
                "category": "Veteran",
                "maximum_score": 10,
                "draws_allowed": false,
                "pairing_deadline_ms": 5000
            }"#,
        )
        .unwrap();
        let mut competition = Competition::new(config).unwrap();
        assert_eq!(competition.kind(), ParticipantKind::Individual);
        assert_eq!(
            competition.config().pairing_deadline(),
            Some(std::time::Duration::from_secs(5))
        );

        for name in ["ADAM", "BERNARD"] {
            competition
                .add_participant(Fencer::new(name, "Claire", Gender::Female, 41).unwrap())
                .unwrap();
        }
        let mut matches = competition.next_round().unwrap();
        assert_eq!(matches.len(), 1);
        assert!(competition
            .enter_scores(&mut matches[0], Score::new(11, None), Score::new(3, None))
            .is_err());
        play_round(&mut competition, &mut matches, 10, 7);

        // only a repeat is possible now
        assert!(matches!(
            competition.next_round(),
            Err(SwissError::PairingIncomplete(_))
        ));
    }
}

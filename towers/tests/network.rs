use approx::assert_relative_eq;
use geo::point;
use serde_json::json;
use towers::{LinkId, Network, NetworkError, RetunePolicy, TowerId};

/// Three towers roughly a kilometer apart along the equator.
fn three_towers() -> (Network, TowerId, TowerId, TowerId) {
    let mut net = Network::new();
    let a = net.add_tower(point!(x: 0.0, y: 0.0), "A");
    let b = net.add_tower(point!(x: 0.01, y: 0.0), "B");
    let c = net.add_tower(point!(x: 0.02, y: 0.0), "C");
    (net, a, b, c)
}

#[test]
fn test_create_link() {
    let (mut net, a, b, _) = three_towers();
    let id = net.create_link(a, b).unwrap();
    let link = net.link(id).unwrap();
    assert_eq!((link.tower_a, link.tower_b), (a, b));
    assert_eq!(link.frequency_ghz, 5.0);
    assert_relative_eq!(link.distance_m, 1_111.949_266_445_587, max_relative = 1e-9);
    assert_relative_eq!(link.distance_km(), 1.111_949_266_445_587, max_relative = 1e-9);
}

#[test]
fn test_duplicate_link_rejected_in_either_direction() {
    let (mut net, a, b, _) = three_towers();
    net.create_link(a, b).unwrap();
    assert_eq!(net.create_link(a, b), Err(NetworkError::DuplicateLink(a, b)));
    assert_eq!(net.create_link(b, a), Err(NetworkError::DuplicateLink(b, a)));
    assert_eq!(net.links().len(), 1);
}

#[test]
fn test_self_link_rejected() {
    let (mut net, a, _, _) = three_towers();
    assert_eq!(net.create_link(a, a), Err(NetworkError::SelfLink(a)));
}

#[test]
fn test_unknown_tower_rejected() {
    let (mut net, a, _, _) = three_towers();
    assert_eq!(
        net.create_link(a, TowerId(999)),
        Err(NetworkError::UnknownTower(TowerId(999)))
    );
}

#[test]
fn test_mismatched_frequencies_rejected() {
    let (mut net, a, b, _) = three_towers();
    net.set_frequency(b, 2.4, RetunePolicy::Reject).unwrap();
    assert_eq!(
        net.create_link(a, b),
        Err(NetworkError::FrequencyMismatch {
            a,
            a_ghz: 5.0,
            b,
            b_ghz: 2.4,
        })
    );
    assert!(net.links().is_empty());
}

#[test]
fn test_retune_linked_tower_rejected() {
    let (mut net, a, b, _) = three_towers();
    let link = net.create_link(a, b).unwrap();
    assert_eq!(
        net.set_frequency(a, 2.4, RetunePolicy::Reject),
        Err(NetworkError::FrequencyMismatch {
            a,
            a_ghz: 2.4,
            b,
            b_ghz: 5.0,
        })
    );
    // Nothing changed.
    assert_eq!(net.tower(a).unwrap().frequency_ghz, 5.0);
    assert_eq!(net.link(link).unwrap().frequency_ghz, 5.0);
}

#[test]
fn test_retune_to_same_frequency_keeps_links() {
    let (mut net, a, b, _) = three_towers();
    let link = net.create_link(a, b).unwrap();
    assert_eq!(net.set_frequency(a, 5.0, RetunePolicy::Reject), Ok(vec![]));
    assert!(net.link(link).is_some());
}

#[test]
fn test_retune_drops_mismatched_links() {
    let (mut net, a, b, c) = three_towers();
    let ab = net.create_link(a, b).unwrap();
    net.set_frequency(c, 2.4, RetunePolicy::Reject).unwrap();

    // Moving b to 2.4 GHz breaks a-b but allows b-c.
    assert_eq!(net.set_frequency(b, 2.4, RetunePolicy::DropLinks), Ok(vec![ab]));
    assert!(net.link(ab).is_none());
    let bc = net.create_link(b, c).unwrap();
    assert_eq!(net.link(bc).unwrap().frequency_ghz, 2.4);
}

#[test]
fn test_retune_pair_with_drop_policy_updates_links() {
    let (mut net, a, b, c) = three_towers();
    net.set_frequency(c, 2.4, RetunePolicy::Reject).unwrap();
    net.set_frequency(b, 2.4, RetunePolicy::Reject).unwrap();
    let bc = net.create_link(b, c).unwrap();
    let ab_err = net.create_link(a, b);
    assert!(matches!(ab_err, Err(NetworkError::FrequencyMismatch { .. })));

    net.set_frequency(a, 2.4, RetunePolicy::DropLinks).unwrap();
    let ab = net.create_link(a, b).unwrap();
    assert_eq!(net.links_of(b).count(), 2);
    assert_eq!(net.link(ab).unwrap().frequency_ghz, 2.4);
    assert_eq!(net.link(bc).unwrap().frequency_ghz, 2.4);
}

#[test]
fn test_delete_tower_removes_its_links() {
    let (mut net, a, b, c) = three_towers();
    net.create_link(a, b).unwrap();
    let bc = net.create_link(b, c).unwrap();
    let removed = net.delete_tower(a).unwrap();
    assert_eq!(removed.id, a);
    assert_eq!(net.towers().len(), 2);
    assert_eq!(net.links().len(), 1);
    assert_eq!(net.links()[0].id, bc);
    assert_eq!(net.delete_tower(a), Err(NetworkError::UnknownTower(a)));
}

#[test]
fn test_delete_link() {
    let (mut net, a, b, _) = three_towers();
    let ab = net.create_link(a, b).unwrap();
    assert_eq!(net.delete_link(ab).unwrap().id, ab);
    assert_eq!(net.delete_link(ab), Err(NetworkError::UnknownLink(ab)));
    // Deleting the link leaves the towers free to be linked again.
    assert!(net.create_link(b, a).is_ok());
}

#[test]
fn test_link_envelope() {
    let (mut net, a, b, _) = three_towers();
    let ab = net.create_link(a, b).unwrap();
    let envelope = net.envelope(ab, 50).unwrap();
    assert_eq!(envelope.len(), 51);
    assert_relative_eq!(envelope[0].x(), envelope[50].x(), max_relative = 1e-12);
    assert_relative_eq!(envelope[0].y(), envelope[50].y(), max_relative = 1e-12);

    let all = net.envelopes(10).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].0, ab);
    assert_eq!(all[0].1.len(), 11);

    net.delete_link(ab).unwrap();
    assert_eq!(net.envelope(ab, 50), Err(NetworkError::UnknownLink(ab)));
}

#[test]
fn test_rename_and_relocate() {
    let (mut net, a, _, _) = three_towers();
    net.rename_tower(a, "Gurten").unwrap();
    net.set_location(a, "Bern, Switzerland").unwrap();
    let tower = net.tower(a).unwrap();
    assert_eq!(tower.name, "Gurten");
    assert_eq!(tower.location, "Bern, Switzerland");
}

#[test]
fn test_network_serializes() {
    let (mut net, a, b, _) = three_towers();
    net.create_link(a, b).unwrap();
    let json = serde_json::to_value(&net).unwrap();
    assert_eq!(json["towers"].as_array().unwrap().len(), 3);
    assert_eq!(json["links"][0]["tower_a"], a.0);
    assert_eq!(json["towers"][1]["position"]["x"], 0.01);
}

/// Two towers at 5.0 GHz with ids 1 and 2, followed by `links`.
fn saved_network(next_id: u64, links: serde_json::Value) -> serde_json::Value {
    json!({
        "towers": [
            {"id": 1, "position": {"x": 0.0, "y": 0.0}, "frequency_ghz": 5.0, "name": "A", "location": ""},
            {"id": 2, "position": {"x": 0.01, "y": 0.0}, "frequency_ghz": 5.0, "name": "B", "location": ""}
        ],
        "links": links,
        "next_id": next_id
    })
}

fn link_json(id: u64, a: u64, b: u64, ghz: f64) -> serde_json::Value {
    json!({"id": id, "tower_a": a, "tower_b": b, "distance_m": 0.0, "frequency_ghz": ghz})
}

#[test]
fn test_network_deserializes() {
    let (mut net, a, b, _) = three_towers();
    let ab = net.create_link(a, b).unwrap();
    let json = serde_json::to_string(&net).unwrap();

    let mut restored: Network = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.towers(), net.towers());
    assert_eq!(restored.links(), net.links());
    let d = restored.add_tower(point!(x: 0.03, y: 0.0), "D");
    assert_eq!(restored.towers().iter().filter(|t| t.id == d).count(), 1);
    assert!(d.0 > ab.0);
}

#[test]
fn test_deserialize_bumps_stale_next_id() {
    let saved = saved_network(0, json!([link_json(3, 1, 2, 5.0)]));
    let mut net: Network = serde_json::from_value(saved).unwrap();
    // The stored distance is recomputed from the tower positions.
    assert_relative_eq!(net.links()[0].distance_m, 1_111.949_266_445_587, max_relative = 1e-9);

    let c = net.add_tower(point!(x: 0.02, y: 0.0), "C");
    assert_eq!(c, TowerId(4));
    assert_eq!(net.set_frequency(TowerId(1), 5.0, RetunePolicy::Reject), Ok(vec![]));
}

#[test]
fn test_deserialize_rejects_broken_networks() {
    let err = |value: serde_json::Value| serde_json::from_value::<Network>(value).unwrap_err().to_string();

    let mismatched = saved_network(3, json!([link_json(3, 1, 2, 9.9)]));
    assert_eq!(
        err(mismatched),
        NetworkError::LinkFrequency {
            link: LinkId(3),
            link_ghz: 9.9,
            tower_ghz: 5.0,
        }
        .to_string()
    );

    let duplicate = saved_network(4, json!([link_json(3, 1, 2, 5.0), link_json(4, 2, 1, 5.0)]));
    assert_eq!(
        err(duplicate),
        NetworkError::DuplicateLink(TowerId(2), TowerId(1)).to_string()
    );

    let unknown = saved_network(3, json!([link_json(3, 1, 7, 5.0)]));
    assert_eq!(err(unknown), NetworkError::UnknownTower(TowerId(7)).to_string());

    let self_link = saved_network(3, json!([link_json(3, 2, 2, 5.0)]));
    assert_eq!(err(self_link), NetworkError::SelfLink(TowerId(2)).to_string());

    let mut retuned = saved_network(2, json!([link_json(3, 1, 2, 5.0)]));
    retuned["towers"][1]["frequency_ghz"] = json!(2.4);
    assert_eq!(
        err(retuned),
        NetworkError::FrequencyMismatch {
            a: TowerId(1),
            a_ghz: 5.0,
            b: TowerId(2),
            b_ghz: 2.4,
        }
        .to_string()
    );

    let mut twins = saved_network(2, json!([]));
    twins["towers"][1]["id"] = json!(1);
    assert_eq!(err(twins), NetworkError::DuplicateId(1).to_string());
}

use crate::drill::DrillConfig;
use crate::net::{Forwarder, LoadBalancer, NetWorld};
use crate::queue::PacketQueue;
use crate::topo::{LeafSpineOpts, build_leaf_spine};

#[test]
fn leaf_spine_builds_full_bipartite_core_and_host_links() {
    let mut world = NetWorld::default();
    let opts = LeafSpineOpts {
        leaves: 3,
        spines: 4,
        hosts_per_leaf: 2,
        ..LeafSpineOpts::default()
    };
    let topo = build_leaf_spine(&mut world, &opts);

    assert_eq!(topo.spines.len(), 4);
    assert_eq!(topo.leaves.len(), 3);
    assert_eq!(topo.hosts.len(), 6);
    assert_eq!(world.net.num_nodes(), 13);
    // Each leaf: 2 links per spine, 2 per host.
    assert_eq!(world.net.links().len(), 3 * (2 * 4 + 2 * 2));

    assert_eq!(world.net.node_name(topo.spines[1]), Some("spine1"));
    assert_eq!(world.net.node_name(topo.leaves[2]), Some("leaf2"));
    assert_eq!(world.net.node_name(topo.host(1, 1)), Some("h1_1"));
    assert_eq!(topo.leaf_of(topo.host(2, 0)), Some(2));
    assert_eq!(topo.leaf_of(topo.spines[0]), None);

    for link in world.net.links() {
        assert_eq!(link.queue.capacity_pkts(), opts.queue_pkts);
    }
}

#[test]
fn leaf_sees_one_candidate_per_spine_toward_remote_hosts() {
    let mut world = NetWorld::default();
    let opts = LeafSpineOpts {
        leaves: 2,
        spines: 3,
        hosts_per_leaf: 2,
        ..LeafSpineOpts::default()
    };
    let topo = build_leaf_spine(&mut world, &opts);

    let remote = topo.host(1, 0);
    let local = topo.host(0, 1);
    let leaf0 = topo.leaves[0];

    let cands = world.net.candidates(leaf0, remote);
    assert_eq!(cands.len(), 3);
    let mut via: Vec<_> = cands.iter().map(|&l| world.net.link(l).to).collect();
    via.sort();
    let mut spines = topo.spines.clone();
    spines.sort();
    assert_eq!(via, spines);

    assert_eq!(world.net.candidates(leaf0, local).len(), 1);
    assert_eq!(world.net.candidates(topo.spines[0], remote).len(), 1);
    assert_eq!(world.net.candidates(topo.host(0, 0), remote).len(), 1);
}

#[test]
fn switches_built_after_balancer_install_get_drill_engines() {
    let mut world = NetWorld::default();
    world
        .net
        .set_load_balancer(LoadBalancer::Drill(DrillConfig::new(3, 1)), 9)
        .expect("valid config");
    let topo = build_leaf_spine(&mut world, &LeafSpineOpts::default());

    for &sw in topo.leaves.iter().chain(topo.spines.iter()) {
        match world.net.forwarder(sw) {
            Some(Forwarder::Drill(engine)) => assert_eq!(engine.config().d, 3),
            other => panic!("expected drill forwarder, got {other:?}"),
        }
    }
    for &h in &topo.hosts {
        assert!(world.net.forwarder(h).is_none());
    }
}

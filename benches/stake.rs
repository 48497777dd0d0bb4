use btcu::chain::*;
use btcu::consensus::*;
use btcu::primitives::*;
use btcu::script::Script;
use btcu::stake::*;
use criterion::*;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn funding_tx() -> Transaction {
    Transaction {
        version: 1,
        vin: vec![TxIn::new(OutPoint::new(Hash256([7; 32]), 0))],
        vout: vec![TxOut::new(250 * COIN, Script(vec![0xac]))],
        ..Default::default()
    }
}

fn build_chain(params: &ChainParams, height: i32, funding: &Transaction) -> MemoryChain {
    let chain = MemoryChain::with_genesis(params.genesis()).unwrap();

    for h in 1..=height {
        let tip = chain.tip().unwrap().unwrap();
        let coinbase = Transaction {
            version: 1,
            vin: vec![TxIn::with_script(
                OutPoint::null(),
                Script(h.to_le_bytes().to_vec()),
            )],
            vout: vec![TxOut::new(0, Script(vec![0xac]))],
            ..Default::default()
        };
        let mut vtx = vec![coinbase];
        if h == 1 {
            vtx.push(funding.clone());
        }

        let mut block = Block {
            vtx,
            ..Default::default()
        };
        block.header.prev_hash = tip.hash;
        block.header.time = params.genesis().header.time + h as u32 * 60;
        block.header.merkle_root = block.compute_merkle_root().0;
        chain.connect_block(&block).unwrap();
    }

    chain
}

pub fn eligibility_benchmark(c: &mut Criterion) {
    let params = ChainParams::new(Network::Main).unwrap();
    let funding = funding_tx();
    let chain = build_chain(&params, 100, &funding);
    let stake: Stake = UtxoStake::new(funding, 0).unwrap().into();

    c.bench_function("has stake min age or depth", |b| {
        b.iter(|| {
            black_box(params.has_stake_min_age_or_depth(
                black_box(100),
                black_box(1_700_000_000),
                black_box(1),
                black_box(1_600_000_000),
            ))
        })
    });

    // Index is cached after the first resolution
    c.bench_function("check utxo stake", |b| {
        b.iter(|| black_box(check_stake(&params, &chain, &stake, 100, 0).unwrap()))
    });

    let genesis_time = params.genesis().header.block_time();
    c.bench_function("check genesis stake", |b| {
        b.iter(|| {
            let stake: Stake = GenesisStake::new(&params, 0).into();
            black_box(check_stake(&params, &chain, &stake, 1, genesis_time).unwrap())
        })
    });
}

pub fn double_stake_benchmark(c: &mut Criterion) {
    let params = ChainParams::new(Network::Main).unwrap();
    let stake: Stake = UtxoStake::new(funding_tx(), 0).unwrap().into();

    c.bench_function("stake uniqueness", |b| {
        b.iter(|| black_box(stake.uniqueness()))
    });

    c.bench_function("stake seen insert and prune", |b| {
        let seen = StakeSeen::new();
        let uniqueness = stake.uniqueness();
        let parent = params.genesis_hash();

        b.iter(|| {
            seen.insert(&uniqueness, parent, 0).unwrap();
            seen.prune_below(1);
        })
    });
}

criterion_group!(benches, eligibility_benchmark, double_stake_benchmark);
criterion_main!(benches);

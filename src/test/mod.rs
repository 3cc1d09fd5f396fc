mod drill_engine;
mod leaf_spine;
mod sim_time;

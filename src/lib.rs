pub mod drill;
pub mod net;
pub mod queue;
pub mod scenario;
pub mod sim;
pub mod topo;
pub mod traffic;

#[cfg(test)]
mod test;

mod test_boundary_basic;
mod test_stripe_basic;

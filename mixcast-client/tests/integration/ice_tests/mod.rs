mod test_candidates_flushed_in_order;

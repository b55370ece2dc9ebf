mod test_ws_end_to_end;
